use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;

/// Search run progress / 搜索进度
#[derive(Debug, Clone)]
pub struct SearchProgress {
    pub is_running: bool,
    pub is_done: bool,
    pub processed: u64,
    pub total: u64,
    pub matches: u64,
    pub error: Option<String>,
    pub last_done_time: Option<i64>,
}

impl Default for SearchProgress {
    fn default() -> Self {
        Self {
            is_running: false,
            is_done: true,
            processed: 0,
            total: 0,
            matches: 0,
            error: None,
            last_done_time: None,
        }
    }
}

/// Shared search state: stop flag plus progress / 搜索状态管理
///
/// The driver checks `is_cancelled` at every file boundary; any other thread
/// may call `cancel` and read `get_progress`.
pub struct SearchState {
    pub running: AtomicBool,
    pub processed: AtomicU64,
    pub progress: RwLock<SearchProgress>,
    pub cancel_flag: AtomicBool,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            processed: AtomicU64::new(0),
            progress: RwLock::new(SearchProgress::default()),
            cancel_flag: AtomicBool::new(false),
        }
    }

    pub fn start(&self, total: u64) {
        self.running.store(true, Ordering::SeqCst);
        self.cancel_flag.store(false, Ordering::SeqCst);
        self.processed.store(0, Ordering::SeqCst);
        let mut progress = self.progress.write();
        progress.is_running = true;
        progress.is_done = false;
        progress.processed = 0;
        progress.total = total;
        progress.matches = 0;
        progress.error = None;
    }

    /// One more file visited / 处理完一个文件
    pub fn increment(&self, matches: u64) -> u64 {
        let count = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        let mut progress = self.progress.write();
        progress.processed = count;
        progress.matches += matches;
        count
    }

    pub fn finish(&self, error: Option<String>) {
        self.running.store(false, Ordering::SeqCst);
        let mut progress = self.progress.write();
        progress.is_running = false;
        progress.is_done = error.is_none();
        progress.error = error;
        progress.last_done_time = Some(chrono::Utc::now().timestamp());
    }

    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        let mut progress = self.progress.write();
        progress.error = Some("Search cancelled".to_string());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn get_progress(&self) -> SearchProgress {
        self.progress.read().clone()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}
