//! Part-of-speech tags (Sejong subset) / 词性标签（世宗标注集子集）

use serde::{Deserialize, Serialize};

/// Sejong tag subset used by the search pipeline.
///
/// Analyser-specific tags the pipeline never branches on (particles, endings,
/// symbols) are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PosTag {
    VV,
    VVIrregular,
    VA,
    VAIrregular,
    VX,
    VCP,
    VCN,
    XSV,
    XSA,
    NNG,
    NNP,
    NNB,
    NR,
    NP,
    MAG,
    MAJ,
    /// Foreign-script token (`SL`), used for English queries
    Foreign,
    /// Sentinel emitted when analysis fails / 分析失败时的哨兵值
    Noun,
    Other(String),
}

impl PosTag {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "VV" => Self::VV,
            "VV-I" => Self::VVIrregular,
            "VA" => Self::VA,
            "VA-I" => Self::VAIrregular,
            "VX" => Self::VX,
            "VCP" => Self::VCP,
            "VCN" => Self::VCN,
            "XSV" => Self::XSV,
            "XSA" => Self::XSA,
            "NNG" => Self::NNG,
            "NNP" => Self::NNP,
            "NNB" => Self::NNB,
            "NR" => Self::NR,
            "NP" => Self::NP,
            "MAG" => Self::MAG,
            "MAJ" => Self::MAJ,
            "SL" => Self::Foreign,
            "Noun" => Self::Noun,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::VV => "VV",
            Self::VVIrregular => "VV-I",
            Self::VA => "VA",
            Self::VAIrregular => "VA-I",
            Self::VX => "VX",
            Self::VCP => "VCP",
            Self::VCN => "VCN",
            Self::XSV => "XSV",
            Self::XSA => "XSA",
            Self::NNG => "NNG",
            Self::NNP => "NNP",
            Self::NNB => "NNB",
            Self::NR => "NR",
            Self::NP => "NP",
            Self::MAG => "MAG",
            Self::MAJ => "MAJ",
            Self::Foreign => "SL",
            Self::Noun => "Noun",
            Self::Other(tag) => tag,
        }
    }

    /// Verb / adjective class that takes inflectional endings / 用言
    pub fn is_verbal(&self) -> bool {
        matches!(
            self,
            Self::VV
                | Self::VVIrregular
                | Self::VA
                | Self::VAIrregular
                | Self::VX
                | Self::VCP
                | Self::VCN
                | Self::XSV
                | Self::XSA
        )
    }

    /// Nouns, adverbs and the analysis-failure sentinel / 体言、副词
    pub fn is_nominal(&self) -> bool {
        matches!(
            self,
            Self::NNG
                | Self::NNP
                | Self::NNB
                | Self::NR
                | Self::NP
                | Self::MAG
                | Self::MAJ
                | Self::Noun
        )
    }

    /// Symbols, particles and endings carry no lexical content.
    pub fn is_functional(&self) -> bool {
        match self {
            Self::Other(tag) => {
                tag.starts_with('J') || tag.starts_with('E') || tag.starts_with('S')
            }
            _ => false,
        }
    }

    /// Display string shown next to results / 显示名称
    pub fn display_name(&self) -> &str {
        match self {
            Self::VV => "동사",
            Self::VVIrregular => "동사(불규칙)",
            Self::VA => "형용사",
            Self::VAIrregular => "형용사(불규칙)",
            Self::VX => "보조 용언",
            Self::VCP => "긍정 지정사",
            Self::VCN => "부정 지정사",
            Self::XSV => "동사 파생 접미사",
            Self::XSA => "형용사 파생 접미사",
            Self::NNG => "일반 명사",
            Self::NNP => "고유 명사",
            Self::NNB => "의존 명사",
            Self::NR => "수사",
            Self::NP => "대명사",
            Self::MAG => "일반 부사",
            Self::MAJ => "접속 부사",
            Self::Foreign => "외국어",
            Self::Noun => "명사",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for PosTag {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<PosTag> for String {
    fn from(tag: PosTag) -> Self {
        tag.as_str().to_string()
    }
}

impl std::fmt::Display for PosTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysed token: surface form, dictionary form and tag / 分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lemma {
    pub surface: String,
    pub lemma: String,
    pub pos: PosTag,
}

impl Lemma {
    /// Noun fallback used for non-Korean input or failed analysis.
    pub fn unanalysed(input: &str) -> Self {
        Self {
            surface: input.to_string(),
            lemma: input.to_string(),
            pos: PosTag::Noun,
        }
    }
}
