//! Variant generator - lemma → surface strings to look for / 变体生成
//!
//! The sets deliberately over-generate: forms that do not exist for a given
//! verb are harmless because only variants observed in text are reported.

use crate::models::push_unique;
use crate::morph::hangul::{coda, medial, split_last, Syllable};
use crate::morph::PosTag;

/// Suffixes attached to the root of a `하다` verb / 하다 动词词尾
const HADA_PARADIGM: &[&str] = &[
    "하기", "하게", "하고", "한", "함", "할", "해", "하여", "해요", "해서",
    "했", "했다", "했어", "했어요", "했고", "했다가", "했으면", "하는", "하면",
    "하니", "하지", "하지 않다", "하지 않아요", "하게", "하게 해", "하게 했다",
];

const CONNECTIVE: &[&str] = &["고", "지", "아", "아서", "아요", "으니", "는", "은", "을", "음", "기"];
const PAST: &[&str] = &["았다", "았어", "았어요", "았고"];
const CAUSATIVE: &[&str] = &["이다", "여", "여서", "여요", "였다", "였어", "였어요", "이고"];

/// Target variant set for a classified keyword / 生成目标变体集合
///
/// `raw_keyword` and `lemma` are always members; order is insertion order.
pub fn generate_variants(raw_keyword: &str, lemma: &str, pos: &PosTag) -> Vec<String> {
    let mut variants = if *pos == PosTag::Foreign {
        english_variants(lemma)
    } else if pos.is_verbal() {
        verbal_variants(lemma)
    } else {
        vec![raw_keyword.to_string()]
    };
    variants.push(raw_keyword.to_string());
    variants.push(lemma.to_string());

    let mut unique = Vec::with_capacity(variants.len());
    for v in &variants {
        push_unique(&mut unique, v);
    }
    unique
}

/// Suffix rules for English; no irregulars / 英文词形
pub fn english_variants(word: &str) -> Vec<String> {
    let is_e = |c: char| c == 'e' || c == 'E';
    let is_y = |c: char| c == 'y' || c == 'Y';

    match (word.strip_suffix(is_e), word.strip_suffix(is_y)) {
        (Some(stem), _) if !stem.is_empty() => vec![
            word.to_string(),
            format!("{}s", word),
            format!("{}d", word),
            format!("{}ing", stem),
        ],
        (_, Some(stem)) if !stem.is_empty() => vec![
            word.to_string(),
            format!("{}ies", stem),
            format!("{}ied", stem),
        ],
        _ => vec![
            word.to_string(),
            format!("{}s", word),
            format!("{}ed", word),
            format!("{}ing", word),
        ],
    }
}

/// Inflected forms of a verb / adjective lemma ending in `다` / 用言变体
pub fn verbal_variants(lemma: &str) -> Vec<String> {
    let Some(stem) = lemma.strip_suffix('다').filter(|s| !s.is_empty()) else {
        return vec![lemma.to_string()];
    };

    if let Some(root) = stem.strip_suffix('하') {
        let mut out = vec![root.to_string(), lemma.to_string(), stem.to_string()];
        out.extend(HADA_PARADIGM.iter().map(|s| format!("{}{}", root, s)));
        return out;
    }

    let mut out = vec![lemma.to_string()];
    for suffix in CONNECTIVE.iter().chain(PAST).chain(CAUSATIVE) {
        out.push(format!("{}{}", stem, suffix));
    }
    out.extend(fused_forms(stem));
    out
}

/// Forms where the ending fuses into the stem's last syllable, plus the
/// `어`-series endings for stems that do not take `아`.
///
/// `쓰` → `써`, `썼다`; `보` → `봐`, `봤`; `살` → `사는`, `산`, `삶`.
fn fused_forms(stem: &str) -> Vec<String> {
    let Some((prefix, last)) = split_last(stem) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let syllable = |s: Syllable| s.compose().map(|c| format!("{}{}", prefix, c));

    if last.is_open() {
        // Adnominal / nominal endings attach as a final consonant: 가 → 간, 갈, 감
        for c in [coda::NIEUN, coda::RIEUL, coda::MIEUM] {
            out.extend(syllable(last.with_coda(c)));
        }
        out.push(format!("{}니", stem));
        out.push(format!("{}면", stem));

        let (infinitive, past) = match contracted_vowel(prefix, last) {
            Some(v) => (
                syllable(last.with_medial(v)),
                syllable(last.with_medial(v).with_coda(coda::SSANGSIOS)),
            ),
            None => {
                let (inf, past) = if last.is_bright() { ("아", "았") } else { ("어", "었") };
                (Some(format!("{}{}", stem, inf)), Some(format!("{}{}", stem, past)))
            }
        };
        if let (Some(inf), Some(past)) = (infinitive, past) {
            push_infinitive_series(&mut out, &inf, &past);
        }
        return out;
    }

    if !last.is_bright() {
        push_infinitive_series(&mut out, &format!("{}어", stem), &format!("{}었", stem));
    } else {
        out.push(format!("{}았", stem));
    }

    if last.coda == coda::RIEUL {
        // ㄹ drops before ㄴ: 살 → 사는, 사니, 산; nominal 삶
        out.extend(syllable(last.with_coda(coda::NONE)).map(|s| format!("{}는", s)));
        out.extend(syllable(last.with_coda(coda::NONE)).map(|s| format!("{}니", s)));
        out.extend(syllable(last.with_coda(coda::NIEUN)));
        out.extend(syllable(last.with_coda(coda::RIEUL_MIEUM)));
        out.push(format!("{}면", stem));
    }
    out
}

fn push_infinitive_series(out: &mut Vec<String>, infinitive: &str, past: &str) {
    out.push(infinitive.to_string());
    out.push(format!("{}서", infinitive));
    out.push(format!("{}요", infinitive));
    out.push(past.to_string());
    for suffix in ["다", "어", "어요", "고"] {
        out.push(format!("{}{}", past, suffix));
    }
}

/// Vowel of an open final syllable after `아/어` contraction, if it contracts.
fn contracted_vowel(prefix: &str, last: Syllable) -> Option<u32> {
    match last.medial {
        medial::A | medial::EO | medial::AE | medial::E | medial::YEO => Some(last.medial),
        medial::O => Some(medial::WA),
        medial::U => Some(medial::WO),
        medial::OE => Some(medial::WAE),
        medial::I => Some(medial::YEO),
        // ㅡ drops; harmony follows the previous syllable: 아프 → 아파, 쓰 → 써
        medial::EU => {
            let bright = split_last(prefix).map(|(_, s)| s.is_bright()).unwrap_or(false);
            Some(if bright { medial::A } else { medial::EO })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn has(set: &[String], v: &str) -> bool {
        set.iter().any(|s| s == v)
    }

    #[test]
    fn test_nominal_branch() {
        assert_eq!(generate_variants("병원", "병원", &PosTag::NNG), vec!["병원"]);
        assert_eq!(generate_variants("빨리", "빨리", &PosTag::MAG), vec!["빨리"]);
        assert_eq!(generate_variants("abc", "abc", &PosTag::Noun), vec!["abc"]);
    }

    #[test]
    fn test_regular_verb() {
        let set = generate_variants("속아", "속다", &PosTag::VV);
        for v in ["속다", "속아", "속고", "속았어요", "속였다", "속이고", "속았"] {
            assert!(has(&set, v), "missing {}", v);
        }
    }

    #[test]
    fn test_hada_verb() {
        let set = generate_variants("공부했어", "공부하다", &PosTag::VV);
        assert!(has(&set, "공부"));
        assert!(has(&set, "공부하다"));
        assert!(has(&set, "공부하"));
        assert!(has(&set, "공부했어"));
        assert!(has(&set, "공부하지 않아요"));
        assert!(set.iter().any(|v| v.ends_with('했')));
        // "하게" appears twice in the paradigm but once in the set
        assert_eq!(set.iter().filter(|v| *v == "공부하게").count(), 1);
    }

    #[test]
    fn test_contracted_forms() {
        let set = verbal_variants("쓰다");
        assert!(has(&set, "썼"));
        assert!(has(&set, "썼다"));
        assert!(has(&set, "써요"));

        let set = verbal_variants("보다");
        assert!(has(&set, "봐"));
        assert!(has(&set, "봤어요"));
        assert!(has(&set, "본"));

        let set = verbal_variants("아프다");
        assert!(has(&set, "아파"));
        assert!(has(&set, "아팠다"));

        let set = verbal_variants("마시다");
        assert!(has(&set, "마셨어"));
    }

    #[test]
    fn test_consonant_stems() {
        let set = verbal_variants("먹다");
        assert!(has(&set, "먹어요"));
        assert!(has(&set, "먹었다"));
        assert!(has(&set, "먹는"));

        let set = verbal_variants("살다");
        assert!(has(&set, "사는"));
        assert!(has(&set, "산"));
        assert!(has(&set, "삶"));
        assert!(has(&set, "살았다"));
    }

    #[test]
    fn test_verbal_lemma_without_da() {
        assert_eq!(verbal_variants("다"), vec!["다"]);
        assert_eq!(generate_variants("이루", "이루", &PosTag::VV), vec!["이루"]);
    }

    #[test]
    fn test_english_rules() {
        assert_eq!(english_variants("walk"), vec!["walk", "walks", "walked", "walking"]);
        assert_eq!(english_variants("apple"), vec!["apple", "apples", "appled", "appling"]);
        assert_eq!(english_variants("carry"), vec!["carry", "carries", "carried"]);
        assert_eq!(english_variants("e"), vec!["e", "es", "eed", "eing"]);
        assert_eq!(
            generate_variants("apple", "apple", &PosTag::Foreign),
            vec!["apple", "apples", "appled", "appling"]
        );
    }

    proptest! {
        #[test]
        fn prop_verbal_set_is_unique_and_complete(stem in "[가-힣]{1,3}") {
            let lemma = format!("{}다", stem);
            let set = generate_variants(&stem, &lemma, &PosTag::VV);
            prop_assert!(set.contains(&lemma));
            prop_assert!(set.contains(&stem));
            prop_assert!(set.iter().all(|v| !v.is_empty()));
            let mut sorted = set.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), set.len());
        }
    }
}
