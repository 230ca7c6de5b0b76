use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::features::{AliasDef, HOSPITAL_DAYS_FEATURE};

const BUILTIN: &[(&str, &str)] = &[
    ("hospital-days", HOSPITAL_DAYS_FEATURE),
    (
        "ltcf",
        "Admission to long-term care facilities within one year",
    ),
    ("esrd", "ESRD on renal replacement"),
    ("steroid", "Steroid use within 3 months"),
    ("vre", "VRE colonization within 6 months"),
    ("endoscopy", "Endoscopy within 1 year"),
    ("cvc", "Central venous catheter"),
    ("ngt", "Nasogastric tube"),
    ("ptbd", "PTBD (percutaneous transhepatic biliary drain)"),
    ("blactam", "β-lactam/β-lactamase inhibitor"),
    ("ceph", "Cephalosporin"),
    ("fq", "Fluoroquinolone"),
    ("carb", "Carbapenem"),
    ("amino", "Aminoglycoside"),
];

pub fn load_builtin_aliases() -> Vec<AliasDef> {
    BUILTIN
        .iter()
        .map(|(key, feature)| AliasDef {
            key: key.to_string(),
            feature: feature.to_string(),
        })
        .collect()
}

pub fn load_alias_tsv(path: &Path) -> Result<Vec<AliasDef>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read alias TSV {}", path.display()))?;
    parse_alias_tsv(&content, &path.display().to_string())
}

/// User entries replace built-ins with the same key in place; new keys go last.
pub fn merge_aliases(mut builtin: Vec<AliasDef>, user: Vec<AliasDef>) -> Vec<AliasDef> {
    if user.is_empty() {
        return builtin;
    }
    let mut user_order: Vec<String> = Vec::new();
    let mut user_map: HashMap<String, AliasDef> = HashMap::new();
    for def in user {
        if !user_map.contains_key(&def.key) {
            user_order.push(def.key.clone());
        }
        user_map.insert(def.key.clone(), def);
    }

    let mut merged = Vec::with_capacity(builtin.len() + user_map.len());
    for def in builtin.drain(..) {
        if let Some(user_def) = user_map.remove(&def.key) {
            merged.push(user_def);
        } else {
            merged.push(def);
        }
    }
    for key in user_order {
        if let Some(def) = user_map.remove(&key) {
            merged.push(def);
        }
    }
    merged
}

fn parse_alias_tsv(content: &str, source: &str) -> Result<Vec<AliasDef>> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').collect();
        if parts.len() != 2 {
            bail!("{}:{} malformed TSV (expected 2 columns)", source, line_no);
        }
        let key = parts[0].trim();
        let feature = parts[1].trim();
        if key.is_empty() || feature.is_empty() {
            bail!("{}:{} empty field in TSV", source, line_no);
        }
        out.push(AliasDef {
            key: key.to_string(),
            feature: feature.to_string(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let defs = parse_alias_tsv("# header\n\nabx\tAntibiotics\n", "test").unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].key, "abx");
        assert_eq!(defs[0].feature, "Antibiotics");
    }

    #[test]
    fn parse_rejects_wrong_column_count() {
        let err = parse_alias_tsv("abx\n", "test").unwrap_err();
        assert!(err.to_string().contains("test:1"));
    }
}
