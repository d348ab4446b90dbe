/// A canonical treatment: uppercase, underscore-separated code plus display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Treatment {
    pub code: &'static str,
    pub name: &'static str,
}

const fn treatment(code: &'static str, name: &'static str) -> Treatment {
    Treatment { code, name }
}

/// Keyword → treatment, in scan order.
pub const TREATMENT_KEYWORDS: &[(&str, Treatment)] = &[
    ("appendectomy", treatment("APPENDECTOMY", "Appendectomy / Appendix surgery")),
    ("cataract", treatment("CATARACT_SURGERY", "Cataract Surgery")),
    ("ceaserean", treatment("C_SECTION", "C-Section")),
    ("cesarean", treatment("C_SECTION", "C-Section")),
    ("c-section", treatment("C_SECTION", "C-Section")),
    ("angioplasty", treatment("ANGIOPLASTY", "Angioplasty")),
    ("coronary angioplasty", treatment("ANGIOPLASTY", "Angioplasty")),
    ("dialysis", treatment("DIALYSIS_SESSION", "Dialysis (per session)")),
    ("kidney dialysis", treatment("DIALYSIS_SESSION", "Dialysis (per session)")),
    ("mri brain", treatment("MRI_BRAIN", "MRI - Brain")),
    ("mri", treatment("MRI_GENERIC", "MRI - Generic")),
    ("x-ray chest", treatment("XRAY_CHEST", "X-Ray - Chest")),
    ("xray", treatment("XRAY_GENERIC", "X-Ray - Generic")),
    ("ct scan", treatment("CT_SCAN", "CT Scan")),
    ("blood transfusion", treatment("BLOOD_TRANSFUSION", "Blood Transfusion")),
    ("chemotherapy", treatment("CHEMO", "Chemotherapy (per cycle)")),
];

/// Alias phrase → keyword in [`TREATMENT_KEYWORDS`], in scan order.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("appendix", "appendectomy"),
    ("cataract surgery", "cataract"),
    ("mri head", "mri brain"),
    ("ct", "ct scan"),
];

/// Common imaging/procedure words tried when nothing else matched.
pub const FALLBACK_KEYWORDS: &[&str] = &[
    "mri",
    "ct scan",
    "dialysis",
    "x-ray",
    "xray",
    "dialysis",
    "angioplasty",
    "cataract",
    "appendix",
];

/// Exact keyword lookup in the main table.
pub fn lookup_keyword(keyword: &str) -> Option<&'static Treatment> {
    TREATMENT_KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == keyword)
        .map(|(_, t)| t)
}

/// Code for a keyword the main table does not know: upper-cased, spaces → `_`.
pub fn synthesize_code(keyword: &str) -> String {
    keyword.to_uppercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_lowercase() {
        for (kw, _) in TREATMENT_KEYWORDS {
            assert_eq!(*kw, kw.to_lowercase(), "keyword {kw:?} must be lowercase");
        }
        for (alias, _) in SYNONYMS {
            assert_eq!(*alias, alias.to_lowercase());
        }
    }

    #[test]
    fn keywords_unique() {
        for (i, (a, _)) in TREATMENT_KEYWORDS.iter().enumerate() {
            assert!(
                TREATMENT_KEYWORDS[i + 1..].iter().all(|(b, _)| a != b),
                "duplicate keyword {a:?}"
            );
        }
    }

    #[test]
    fn codes_are_canonical() {
        for (_, t) in TREATMENT_KEYWORDS {
            assert!(
                t.code.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "code {:?} is not canonical",
                t.code
            );
        }
    }

    #[test]
    fn every_synonym_targets_a_known_keyword() {
        for (alias, target) in SYNONYMS {
            assert!(lookup_keyword(target).is_some(), "{alias} → {target} is dangling");
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(lookup_keyword("mri").unwrap().code, "MRI_GENERIC");
        assert_eq!(lookup_keyword("mri brain").unwrap().code, "MRI_BRAIN");
        assert!(lookup_keyword("MRI").is_none());
        assert!(lookup_keyword("x-ray").is_none());
    }

    #[test]
    fn synthesized_codes() {
        assert_eq!(synthesize_code("x-ray"), "X-RAY");
        assert_eq!(synthesize_code("bone marrow biopsy"), "BONE_MARROW_BIOPSY");
    }
}
