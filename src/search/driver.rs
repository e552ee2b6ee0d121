//! Search driver / 搜索驱动
//!
//! Classify the keyword once, build the matcher once, then walk the tree one
//! file at a time. A `SearchRun` is an iterator of per-file events; the stop
//! flag in `SearchState` is checked between files, never inside one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::{Result, SearchError};
use crate::extract::{extract_lines, FileFormat};
use crate::models::{push_unique, Line, Match, SearchMode, SearchOptions, SearchRecord};
use crate::morph::{Lemma, Oracle, PosTag};
use crate::state::SearchState;

use super::idiom::IdiomMatcher;
use super::matcher::{RegexMatcher, VariantMatcher};
use super::variants::generate_variants;

/// Progress emitted after each file / 每个文件处理后的事件
#[derive(Debug)]
pub enum SearchEvent {
    FileDone {
        path: PathBuf,
        processed: usize,
        total: usize,
        matches: usize,
    },
    FileFailed {
        path: PathBuf,
        processed: usize,
        total: usize,
        error: SearchError,
    },
    Cancelled {
        processed: usize,
        total: usize,
    },
}

/// How lines are tested, decided once per query / 查询计划
enum QueryPlan {
    /// Nothing to look for
    Empty,
    Variants(VariantMatcher),
    Regex { pattern: String, matcher: RegexMatcher },
    Idiom(IdiomMatcher),
}

/// What a single line contributed / 单行命中
enum Observation {
    Variant { variant: String, surface: String },
    Fallback(String),
    Pattern(String),
    Idiom(Vec<String>),
}

/// Entry point holding the analyser handle / 搜索入口
#[derive(Clone)]
pub struct Searcher {
    oracle: Oracle,
}

impl Searcher {
    pub fn new(oracle: Oracle) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    /// Runs a query to completion / 执行完整搜索
    pub fn search(
        &self,
        path: &Path,
        raw_keyword: &str,
        mode: SearchMode,
        options: &SearchOptions,
    ) -> Result<SearchRecord> {
        self.search_with(path, raw_keyword, mode, options, Arc::new(SearchState::new()), |_, _| {})
    }

    /// Runs a query, reporting `(processed, total)` after every file and
    /// stopping early once `state` is cancelled.
    pub fn search_with<F>(
        &self,
        path: &Path,
        raw_keyword: &str,
        mode: SearchMode,
        options: &SearchOptions,
        state: Arc<SearchState>,
        mut progress: F,
    ) -> Result<SearchRecord>
    where
        F: FnMut(usize, usize),
    {
        let mut run = self.start(path, raw_keyword, mode, options, state)?;
        for event in run.by_ref() {
            match event {
                SearchEvent::FileDone { processed, total, .. }
                | SearchEvent::FileFailed { processed, total, .. } => progress(processed, total),
                SearchEvent::Cancelled { .. } => {}
            }
        }
        Ok(run.finish())
    }

    /// Prepares a run without touching any file content / 准备搜索
    ///
    /// Query-level failures (missing root, bad regex) surface here.
    pub fn start(
        &self,
        path: &Path,
        raw_keyword: &str,
        mode: SearchMode,
        options: &SearchOptions,
        state: Arc<SearchState>,
    ) -> Result<SearchRun> {
        let keyword = raw_keyword.trim();
        let mut record = SearchRecord::empty(raw_keyword, mode);
        record.case_sensitive = mode.is_korean() || options.case_sensitive;

        if keyword.is_empty() {
            return Ok(SearchRun::new(self.oracle.clone(), QueryPlan::Empty, Vec::new(), state, record, None));
        }
        if !path.exists() {
            return Err(SearchError::PathNotFound(path.to_path_buf()));
        }

        let (plan, stem) = self.plan(keyword, mode, options, &mut record)?;
        let files = if matches!(plan, QueryPlan::Empty) {
            Vec::new()
        } else {
            collect_files(path)
        };

        tracing::info!(
            "Searching {} for '{}' ({:?}, lemma={}, pos={}, {} variants, {} files)",
            path.display(),
            keyword,
            mode,
            record.lemma,
            record.pos,
            record.target_variant_set.len(),
            files.len()
        );
        Ok(SearchRun::new(self.oracle.clone(), plan, files, state, record, stem))
    }

    /// Classifies the keyword and fills the query-level fields of `record`.
    fn plan(
        &self,
        keyword: &str,
        mode: SearchMode,
        options: &SearchOptions,
        record: &mut SearchRecord,
    ) -> Result<(QueryPlan, Option<String>)> {
        let case_sensitive = record.case_sensitive;

        if options.exact_match {
            if let Some(literal) = unquote(keyword) {
                set_lemma(record, Lemma::unanalysed(literal), mode);
                if literal.is_empty() {
                    return Ok((QueryPlan::Empty, None));
                }
                record.target_variant_set = vec![literal.to_string()];
                let matcher = VariantMatcher::new(&record.target_variant_set, case_sensitive);
                return Ok((QueryPlan::Variants(matcher), None));
            }
        }

        if options.regex_enabled {
            let matcher = RegexMatcher::new(keyword, case_sensitive)?;
            set_lemma(record, Lemma::unanalysed(keyword), mode);
            record.target_variant_set = vec![keyword.to_string()];
            let plan = QueryPlan::Regex {
                pattern: keyword.to_string(),
                matcher,
            };
            return Ok((plan, None));
        }

        match mode {
            SearchMode::KoreanIdiom => {
                let idiom = IdiomMatcher::new(keyword);
                let core: Vec<&str> = idiom.core_words().iter().map(|w| w.word.as_str()).collect();
                set_lemma(record, Lemma::unanalysed(&core.join(" ")), mode);
                if idiom.is_empty() {
                    return Ok((QueryPlan::Empty, None));
                }
                record.target_variant_set = idiom.target_variants();
                Ok((QueryPlan::Idiom(idiom), None))
            }
            SearchMode::English => {
                let lemma = Lemma {
                    surface: keyword.to_string(),
                    lemma: keyword.to_string(),
                    pos: PosTag::Foreign,
                };
                record.target_variant_set = generate_variants(keyword, &lemma.lemma, &lemma.pos);
                set_lemma(record, lemma, mode);
                let matcher = VariantMatcher::new(&record.target_variant_set, case_sensitive);
                Ok((QueryPlan::Variants(matcher), None))
            }
            SearchMode::KoreanWord => {
                // A phrase is looked up as-is; only single tokens are analysed.
                let lemma = if keyword.contains(char::is_whitespace) {
                    Lemma::unanalysed(keyword)
                } else {
                    self.oracle.analyse(keyword)
                };
                record.target_variant_set = generate_variants(keyword, &lemma.lemma, &lemma.pos);
                let mut matcher = VariantMatcher::new(&record.target_variant_set, true);
                let mut stem = None;
                if lemma.pos.is_verbal() {
                    matcher = matcher.with_fallback(lemma.lemma.clone());
                    stem = lemma
                        .lemma
                        .strip_suffix('다')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string);
                }
                set_lemma(record, lemma, mode);
                Ok((QueryPlan::Variants(matcher), stem))
            }
        }
    }
}

fn set_lemma(record: &mut SearchRecord, lemma: Lemma, mode: SearchMode) {
    record.is_verb_adj = lemma.pos.is_verbal();
    record.is_noun_adv = mode.is_korean() && lemma.pos.is_nominal();
    record.lemma = lemma.lemma;
    record.pos = lemma.pos;
}

/// `"word"` → `word` / 去掉引号
fn unquote(keyword: &str) -> Option<&str> {
    keyword
        .strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .or_else(|| keyword.strip_prefix('“').and_then(|k| k.strip_suffix('”')))
}

/// Eligible files under `root`, in walk order / 收集待搜索文件
///
/// A single file is searched whatever its extension; its format error then
/// shows up as a per-file failure.
fn collect_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && FileFormat::is_supported(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// One query in progress / 进行中的搜索
pub struct SearchRun {
    oracle: Oracle,
    plan: QueryPlan,
    files: std::vec::IntoIter<PathBuf>,
    total: usize,
    processed: usize,
    state: Arc<SearchState>,
    record: SearchRecord,
    /// Verbal stem reported alongside the lemma for highlighting
    stem: Option<String>,
    done: bool,
}

impl SearchRun {
    fn new(
        oracle: Oracle,
        plan: QueryPlan,
        files: Vec<PathBuf>,
        state: Arc<SearchState>,
        record: SearchRecord,
        stem: Option<String>,
    ) -> Self {
        let total = files.len();
        state.start(total as u64);
        Self {
            oracle,
            plan,
            files: files.into_iter(),
            total,
            processed: 0,
            state,
            record,
            stem,
            done: false,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Record built so far / 当前结果
    pub fn record(&self) -> &SearchRecord {
        &self.record
    }

    /// Drives the run to its end and returns the record / 结束并返回结果
    ///
    /// After a cancellation the record only covers the files already visited.
    pub fn finish(mut self) -> SearchRecord {
        for _ in self.by_ref() {}
        tracing::info!("{}", self.record.summary());
        self.record
    }

    fn search_file(&mut self, path: &Path) -> Result<usize> {
        let lines = extract_lines(path)?;
        let before = self.record.search_results.len();
        for line in lines {
            if let Some(observation) = self.observe(&line) {
                self.apply(line, observation);
            }
        }
        Ok(self.record.search_results.len() - before)
    }

    fn observe(&self, line: &Line) -> Option<Observation> {
        match &self.plan {
            QueryPlan::Empty => None,
            QueryPlan::Variants(matcher) => matcher.match_line(&line.content, &self.oracle).map(|hit| {
                if hit.via_fallback {
                    Observation::Fallback(hit.keyword)
                } else {
                    Observation::Variant {
                        variant: hit.variant,
                        surface: hit.keyword,
                    }
                }
            }),
            QueryPlan::Regex { matcher, .. } => {
                matcher.match_line(&line.content).map(|hit| Observation::Pattern(hit.keyword))
            }
            QueryPlan::Idiom(idiom) => idiom.match_line(&line.content).map(Observation::Idiom),
        }
    }

    fn apply(&mut self, line: Line, observation: Observation) {
        let record = &mut self.record;
        let found = match observation {
            Observation::Variant { variant, surface } => {
                push_unique(&mut record.actual_variant_set, &variant);
                push_unique(&mut record.matched_terms_set, &surface);
                push_unique(&mut record.matched_terms_set, &record.lemma);
                if let Some(stem) = &self.stem {
                    push_unique(&mut record.matched_terms_set, stem);
                }
                Match::from_line(line, surface)
            }
            Observation::Fallback(surface) => {
                push_unique(&mut record.matched_terms_set, &surface);
                push_unique(&mut record.matched_terms_set, &record.lemma);
                Match::from_line(line, surface)
            }
            Observation::Pattern(text) => {
                // Regex hits relax the target-set invariant: the matched text is not in `[pattern]`.
                if let QueryPlan::Regex { pattern, .. } = &self.plan {
                    push_unique(&mut record.actual_variant_set, pattern);
                }
                push_unique(&mut record.matched_terms_set, &text);
                Match::from_line(line, text)
            }
            Observation::Idiom(variants) => {
                for v in &variants {
                    push_unique(&mut record.actual_variant_set, v);
                    push_unique(&mut record.matched_terms_set, v);
                }
                Match::from_idiom(line, variants)
            }
        };
        record.search_results.push(found);
    }
}

impl Iterator for SearchRun {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        if self.done {
            return None;
        }
        if self.state.is_cancelled() {
            self.done = true;
            self.record.cancelled = true;
            self.state.finish(Some("Search cancelled".to_string()));
            tracing::info!("Search cancelled after {}/{} files", self.processed, self.total);
            return Some(SearchEvent::Cancelled {
                processed: self.processed,
                total: self.total,
            });
        }
        let Some(path) = self.files.next() else {
            self.done = true;
            self.state.finish(None);
            return None;
        };

        let outcome = self.search_file(&path);
        self.processed += 1;
        let event = match outcome {
            Ok(matches) => {
                self.record.files_scanned += 1;
                self.state.increment(matches as u64);
                tracing::debug!("Searched {}: {} matches", path.display(), matches);
                SearchEvent::FileDone {
                    path,
                    processed: self.processed,
                    total: self.total,
                    matches,
                }
            }
            Err(error) => {
                self.record.files_failed += 1;
                self.state.increment(0);
                tracing::warn!("Skipping {}: {}", path.display(), error);
                SearchEvent::FileFailed {
                    path,
                    processed: self.processed,
                    total: self.total,
                    error,
                }
            }
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn searcher() -> Searcher {
        Searcher::new(Oracle::rule_based())
    }

    fn korean(dir: &Path, keyword: &str) -> SearchRecord {
        searcher()
            .search(dir, keyword, SearchMode::KoreanWord, &SearchOptions::default())
            .unwrap()
    }

    fn corpus(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn has(set: &[String], v: &str) -> bool {
        set.iter().any(|s| s == v)
    }

    #[test]
    fn test_korean_verbal_past_tense() {
        let dir = corpus(&[("a.txt", "나는 속았어요.")]);
        let record = korean(dir.path(), "속아");
        assert_eq!(record.lemma, "속다");
        assert!(record.pos.is_verbal());
        assert!(record.is_verb_adj);
        assert!(has(&record.target_variant_set, "속았어요"));
        assert!(has(&record.matched_terms_set, "속았어요"));
        assert!(has(&record.matched_terms_set, "속다"));
        assert_eq!(record.search_results.len(), 1);
        let m = &record.search_results[0];
        assert_eq!(m.line_no, 1);
        assert_eq!(m.matched_keyword, "속았어요");
        assert_eq!(m.content, "나는 속았어요.");
    }

    #[test]
    fn test_korean_noun() {
        let dir = corpus(&[("b.txt", "병원에 갔다.")]);
        let record = korean(dir.path(), "병원");
        assert!(record.pos.is_nominal());
        assert!(record.is_noun_adv);
        assert_eq!(record.target_variant_set, vec!["병원"]);
        assert_eq!(record.search_results.len(), 1);
        assert_eq!(record.search_results[0].matched_keyword, "병원");
    }

    #[test]
    fn test_stem_reported_with_variant() {
        let dir = corpus(&[("c.txt", "이루는 꿈.")]);
        let record = korean(dir.path(), "이루다");
        assert_eq!(record.search_results.len(), 1);
        assert_eq!(record.search_results[0].matched_keyword, "이루는");
        assert!(has(&record.matched_terms_set, "이루"));
        assert!(has(&record.matched_terms_set, "이루다"));
    }

    #[test]
    fn test_idiom_with_particles() {
        let dir = corpus(&[("d.txt", "그는 인심을 크게 썼다.")]);
        let record = searcher()
            .search(dir.path(), "인심을 쓰다", SearchMode::KoreanIdiom, &SearchOptions::default())
            .unwrap();
        assert_eq!(record.lemma, "인심 쓰다");
        assert!(has(&record.target_variant_set, "썼다"));
        assert_eq!(record.search_results.len(), 1);
        assert_eq!(record.search_results[0].matched_keywords, vec!["인심", "썼다"]);
        assert!(has(&record.actual_variant_set, "썼다"));
    }

    #[test]
    fn test_english_case_insensitive() {
        let dir = corpus(&[("e.srt", "1\n00:00:01,000 --> 00:00:02,000\nHe likes Apples.\n")]);
        let record = searcher()
            .search(dir.path(), "apple", SearchMode::English, &SearchOptions::default())
            .unwrap();
        assert_eq!(
            record.target_variant_set,
            vec!["apple", "apples", "appled", "appling"]
        );
        assert!(!record.case_sensitive);
        assert_eq!(record.search_results.len(), 1);
        let m = &record.search_results[0];
        assert_eq!(m.matched_keyword, "Apples");
        assert!(m.content.contains(m.matched_keyword.as_str()));
        assert_eq!(record.actual_variant_set, vec!["apples"]);
        assert!(has(&record.matched_terms_set, "Apples"));
        assert_eq!(m.time_axis, "00:00:01,000 --> 00:00:02,000");

        let strict = searcher()
            .search(
                dir.path(),
                "apple",
                SearchMode::English,
                &SearchOptions::new().case_sensitive(true),
            )
            .unwrap();
        assert!(strict.search_results.is_empty());
    }

    #[test]
    fn test_markdown_episode_and_timestamp() {
        let dir = corpus(&[("f.md", "# Death's Game S01E02\n[00:02:36] 현주 병원 갔잖아\n")]);
        let record = korean(dir.path(), "병원");
        assert_eq!(record.search_results.len(), 1);
        let m = &record.search_results[0];
        assert_eq!(m.episode, "# Death's Game S01E02");
        assert_eq!(m.time_axis, "[00:02:36]");
    }

    #[test]
    fn test_record_invariants() {
        let dir = corpus(&[
            ("a.txt", "나는 속았어요.\n저는 속습니다\n속지 마"),
            ("sub/b.txt", "다시 속아 넘어갔다"),
        ]);
        let record = korean(dir.path(), "속아");
        assert!(record.search_results.len() >= 3);
        for m in &record.search_results {
            assert!(m.content.contains(&m.matched_keyword));
            assert!(
                has(&record.target_variant_set, &m.matched_keyword)
                    || has(&record.matched_terms_set, &m.matched_keyword)
            );
        }
        for v in &record.actual_variant_set {
            assert!(has(&record.target_variant_set, v));
        }
        // "속습니다" is only reachable through sentence analysis
        assert!(record
            .search_results
            .iter()
            .any(|m| m.content == "저는 속습니다" && m.matched_keyword == "속"));
    }

    #[test]
    fn test_results_follow_walk_and_line_order() {
        let dir = corpus(&[
            ("b.txt", "병원 둘\n병원 셋"),
            ("a.txt", "병원 하나"),
            ("notes.bin", "병원"),
        ]);
        let record = korean(dir.path(), "병원");
        let order: Vec<(String, usize)> = record
            .search_results
            .iter()
            .map(|m| (Path::new(&m.file_path).file_name().unwrap().to_string_lossy().to_string(), m.line_no))
            .collect();
        assert_eq!(
            order,
            vec![("a.txt".into(), 1), ("b.txt".into(), 1), ("b.txt".into(), 2)]
        );
        assert_eq!(record.files_scanned, 2);
    }

    #[test]
    fn test_idempotent() {
        let dir = corpus(&[("a.txt", "나는 속았어요."), ("b.txt", "속아 넘어갔다")]);
        let first = korean(dir.path(), "속아");
        let second = korean(dir.path(), "속아");
        assert_eq!(first.search_results, second.search_results);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_keyword_touches_nothing() {
        let missing = Path::new("/definitely/not/here");
        let record = searcher()
            .search(missing, "   ", SearchMode::KoreanWord, &SearchOptions::default())
            .unwrap();
        assert!(record.search_results.is_empty());
        assert!(record.target_variant_set.is_empty());
        assert_eq!(record.files_scanned, 0);
    }

    #[test]
    fn test_missing_root() {
        let result = searcher().search(
            Path::new("/definitely/not/here"),
            "병원",
            SearchMode::KoreanWord,
            &SearchOptions::default(),
        );
        assert!(matches!(result, Err(SearchError::PathNotFound(_))));
    }

    #[test]
    fn test_bad_file_is_skipped() {
        let dir = corpus(&[("a.txt", "병원에 갔다."), ("broken.pdf", "not a pdf")]);
        let mut failures = 0;
        let mut run = searcher()
            .start(
                dir.path(),
                "병원",
                SearchMode::KoreanWord,
                &SearchOptions::default(),
                Arc::new(SearchState::new()),
            )
            .unwrap();
        for event in run.by_ref() {
            if let SearchEvent::FileFailed { error, .. } = event {
                assert!(error.is_per_file());
                failures += 1;
            }
        }
        assert_eq!(failures, 1);
        let record = run.finish();
        assert_eq!(record.files_failed, 1);
        assert_eq!(record.search_results.len(), 1);
    }

    #[test]
    fn test_cancellation_returns_partial_record() {
        let dir = corpus(&[("a.txt", "병원 하나"), ("b.txt", "병원 둘"), ("c.txt", "병원 셋")]);
        let state = Arc::new(SearchState::new());
        let mut run = searcher()
            .start(dir.path(), "병원", SearchMode::KoreanWord, &SearchOptions::default(), state.clone())
            .unwrap();
        assert_eq!(run.total(), 3);

        assert!(matches!(run.next(), Some(SearchEvent::FileDone { processed: 1, .. })));
        state.cancel();
        assert!(matches!(run.next(), Some(SearchEvent::Cancelled { processed: 1, total: 3 })));
        assert!(run.next().is_none());

        let record = run.finish();
        assert!(record.cancelled);
        assert_eq!(record.search_results.len(), 1);
        assert_eq!(record.files_scanned, 1);
    }

    #[test]
    fn test_progress_callback() {
        let dir = corpus(&[("a.txt", "병원"), ("b.txt", "학교")]);
        let mut seen = Vec::new();
        searcher()
            .search_with(
                dir.path(),
                "병원",
                SearchMode::KoreanWord,
                &SearchOptions::default(),
                Arc::new(SearchState::new()),
                |processed, total| seen.push((processed, total)),
            )
            .unwrap();
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_regex_mode() {
        let dir = corpus(&[("a.txt", "병원에 갔다.\n학교에 갔다.\n집에 왔다.")]);
        let record = searcher()
            .search(
                dir.path(),
                "병원|학교",
                SearchMode::KoreanWord,
                &SearchOptions::new().regex(true),
            )
            .unwrap();
        assert_eq!(record.search_results.len(), 2);
        assert_eq!(record.actual_variant_set, vec!["병원|학교"]);
        assert_eq!(record.matched_terms_set, vec!["병원", "학교"]);

        let bad = searcher().search(
            dir.path(),
            "(",
            SearchMode::KoreanWord,
            &SearchOptions::new().regex(true),
        );
        assert!(matches!(bad, Err(SearchError::InvalidRegex { .. })));
    }

    #[test]
    fn test_exact_match_skips_expansion() {
        let dir = corpus(&[("a.txt", "나는 속았어요.\n속아 넘어갔다")]);
        let record = searcher()
            .search(
                dir.path(),
                "\"속아\"",
                SearchMode::KoreanWord,
                &SearchOptions::new().exact(true),
            )
            .unwrap();
        assert_eq!(record.target_variant_set, vec!["속아"]);
        assert_eq!(record.search_results.len(), 1);
        assert_eq!(record.search_results[0].line_no, 2);
    }

    #[test]
    fn test_single_file_root() {
        let dir = corpus(&[("a.txt", "병원에 갔다."), ("b.txt", "병원")]);
        let record = korean(&dir.path().join("a.txt"), "병원");
        assert_eq!(record.files_scanned, 1);
        assert_eq!(record.search_results.len(), 1);
    }
}
