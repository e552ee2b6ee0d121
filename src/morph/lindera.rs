//! ko-dic analyser backed by lindera / 基于 lindera 的 ko-dic 分析器
//!
//! ko-dic feature layout: `[pos, semantic, jongseong, reading, type, first_pos,
//! last_pos, expression]`. Inflected tokens (`type == "Inflect"`) carry their
//! dictionary stem in `expression`, e.g. `돕/VV/*+아/EC/*`.

use ::lindera::dictionary::{load_dictionary_from_kind, DictionaryKind};
use ::lindera::mode::Mode;
use ::lindera::segmenter::Segmenter;
use ::lindera::tokenizer::Tokenizer;

use crate::error::{Result, SearchError};

use super::analyzer::{Analyzer, Morpheme};
use super::pos::PosTag;

pub struct LinderaAnalyzer {
    tokenizer: Tokenizer,
}

impl LinderaAnalyzer {
    pub fn new() -> Result<Self> {
        let dictionary = load_dictionary_from_kind(DictionaryKind::KoDic)
            .map_err(|e| SearchError::AnalyzerUnavailable(e.to_string()))?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        Ok(Self {
            tokenizer: Tokenizer::new(segmenter),
        })
    }
}

impl Analyzer for LinderaAnalyzer {
    fn name(&self) -> &'static str {
        "lindera-ko-dic"
    }

    fn analyse(&self, text: &str) -> Result<Vec<Morpheme>> {
        let mut tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|e| SearchError::AnalyzerUnavailable(e.to_string()))?;

        let mut morphemes = Vec::with_capacity(tokens.len());
        for token in tokens.iter_mut() {
            let surface = token.text.to_string();
            let details: Vec<String> = token.details().into_iter().map(str::to_string).collect();

            let Some(first) = details.first() else {
                morphemes.push(Morpheme::new(surface, PosTag::Noun));
                continue;
            };

            // Compound tags look like "VV+EC"; the first component decides the class.
            let tag = PosTag::parse(first.split('+').next().unwrap_or(first));
            let mut morpheme = Morpheme::new(surface, tag);

            if details.get(4).map(String::as_str) == Some("Inflect") {
                if let Some(base) = details
                    .get(7)
                    .and_then(|expr| expr.split('+').next())
                    .and_then(|head| head.split('/').next())
                {
                    morpheme = morpheme.with_base(base);
                }
            }
            morphemes.push(morpheme);
        }
        Ok(morphemes)
    }
}
