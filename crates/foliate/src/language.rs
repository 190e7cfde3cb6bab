//! Dominant-script detection driving the inter-fragment whitespace policy.

/// A detected dominant script. Controls whether merging inserts a separating space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    SimplifiedChinese,
    TraditionalChinese,
    Other,
}

impl Language {
    /// `en` and other Latin scripts need a space between joined fragments; CJK scripts don't.
    pub fn inserts_space_between_merges(&self) -> bool {
        !matches!(self, Language::SimplifiedChinese | Language::TraditionalChinese)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::SimplifiedChinese => "zh-Hans",
            Language::TraditionalChinese => "zh-Hant",
            Language::Other => "und",
        }
    }
}

fn is_han(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Simplified-only character ranges not used in traditional orthography (a small,
/// high-signal subset sufficient to disambiguate common document text).
fn is_simplified_only(c: char) -> bool {
    matches!(
        c,
        '国' | '学' | '会' | '们' | '这' | '说' | '对' | '现' | '经' | '后' | '发' | '还' | '长' | '应' | '体' | '语'
    )
}

/// Traditional-only character ranges not used in simplified orthography.
fn is_traditional_only(c: char) -> bool {
    matches!(
        c,
        '國' | '學' | '會' | '們' | '這' | '說' | '對' | '現' | '經' | '後' | '發' | '還' | '長' | '應' | '體' | '語'
    )
}

/// Classifies the dominant script of `text` and a confidence in `[0, 1]`.
///
/// Preferred source is embedded PDF text when recoverable (callers pass that
/// through unchanged); otherwise raw OCR text, as here.
pub fn detect_language(text: &str) -> (Language, f32) {
    let total = text.chars().filter(|c| c.is_alphanumeric() || is_han(*c)).count();
    if total == 0 {
        return (Language::English, 0.0);
    }

    let han_count = text.chars().filter(|c| is_han(*c)).count();
    if han_count == 0 {
        return (Language::English, 1.0);
    }

    let simplified_hits = text.chars().filter(|c| is_simplified_only(*c)).count();
    let traditional_hits = text.chars().filter(|c| is_traditional_only(*c)).count();
    let han_ratio = han_count as f32 / total as f32;

    let lang = if simplified_hits >= traditional_hits { Language::SimplifiedChinese } else { Language::TraditionalChinese };
    (lang, han_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        let (lang, confidence) = detect_language("The quick brown fox jumps over the lazy dog.");
        assert_eq!(lang, Language::English);
        assert!(confidence > 0.9);
    }

    #[test]
    fn test_detect_simplified_chinese() {
        let (lang, _) = detect_language("访问控制管理办法适用于国内所有系统");
        assert_eq!(lang, Language::SimplifiedChinese);
    }

    #[test]
    fn test_detect_traditional_chinese() {
        let (lang, _) = detect_language("訪問控制管理辦法適用於國內所有系統");
        assert_eq!(lang, Language::TraditionalChinese);
    }

    #[test]
    fn test_detect_empty_text() {
        let (lang, confidence) = detect_language("   ");
        assert_eq!(lang, Language::English);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_space_policy_by_language() {
        assert!(Language::English.inserts_space_between_merges());
        assert!(!Language::SimplifiedChinese.inserts_space_between_merges());
        assert!(!Language::TraditionalChinese.inserts_space_between_merges());
    }
}
