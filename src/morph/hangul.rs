//! Hangul syllable arithmetic / 韩文音节分解与组合
//!
//! A precomposed syllable is `0xAC00 + (initial * 21 + medial) * 28 + final`.

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

/// Medial vowel indices / 中声
pub mod medial {
    pub const A: u32 = 0; // ㅏ
    pub const AE: u32 = 1; // ㅐ
    pub const YA: u32 = 2; // ㅑ
    pub const EO: u32 = 4; // ㅓ
    pub const E: u32 = 5; // ㅔ
    pub const YEO: u32 = 6; // ㅕ
    pub const O: u32 = 8; // ㅗ
    pub const WA: u32 = 9; // ㅘ
    pub const WAE: u32 = 10; // ㅙ
    pub const OE: u32 = 11; // ㅚ
    pub const U: u32 = 13; // ㅜ
    pub const WO: u32 = 14; // ㅝ
    pub const EU: u32 = 18; // ㅡ
    pub const I: u32 = 20; // ㅣ
}

/// Final consonant indices / 终声
pub mod coda {
    pub const NONE: u32 = 0;
    pub const NIEUN: u32 = 4; // ㄴ
    pub const RIEUL: u32 = 8; // ㄹ
    pub const RIEUL_MIEUM: u32 = 10; // ㄻ
    pub const MIEUM: u32 = 16; // ㅁ
    pub const SSANGSIOS: u32 = 20; // ㅆ
    pub const IEUNG: u32 = 21; // ㅇ
}

/// True for any code point in the Hangul syllable block U+AC00..U+D7AF.
pub fn is_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7AF}').contains(&c)
}

pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(is_syllable)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syllable {
    pub initial: u32,
    pub medial: u32,
    pub coda: u32,
}

impl Syllable {
    pub fn decompose(c: char) -> Option<Self> {
        let code = c as u32;
        if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
            return None;
        }
        let index = code - SYLLABLE_BASE;
        Some(Self {
            initial: index / (MEDIAL_COUNT * FINAL_COUNT),
            medial: (index % (MEDIAL_COUNT * FINAL_COUNT)) / FINAL_COUNT,
            coda: index % FINAL_COUNT,
        })
    }

    pub fn compose(self) -> Option<char> {
        if self.initial >= 19 || self.medial >= MEDIAL_COUNT || self.coda >= FINAL_COUNT {
            return None;
        }
        let code =
            SYLLABLE_BASE + (self.initial * MEDIAL_COUNT + self.medial) * FINAL_COUNT + self.coda;
        char::from_u32(code)
    }

    pub fn with_medial(self, medial: u32) -> Self {
        Self { medial, ..self }
    }

    pub fn with_coda(self, coda: u32) -> Self {
        Self { coda, ..self }
    }

    pub fn is_open(&self) -> bool {
        self.coda == coda::NONE
    }

    /// ㅏ / ㅗ / ㅑ take the `아` ending series, everything else `어`.
    pub fn is_bright(&self) -> bool {
        matches!(self.medial, medial::A | medial::O | medial::YA)
    }
}

/// Splits off the last syllable of `text` / 拆出最后一个音节
pub fn split_last(text: &str) -> Option<(&str, Syllable)> {
    let last = text.chars().last()?;
    let syllable = Syllable::decompose(last)?;
    Some((&text[..text.len() - last.len_utf8()], syllable))
}
