//! The browser-automation seam: every concrete driver (Playwright over
//! CDP, a headless-chrome binding, or a fake used in tests) implements
//! this trait, and the runner only ever talks to it.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::DemoResult;

#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> DemoResult<()>;
    async fn click(&mut self, selector: &str) -> DemoResult<()>;
    async fn fill(&mut self, selector: &str, value: &str) -> DemoResult<()>;
    async fn press(&mut self, key: &str) -> DemoResult<()>;
    async fn wait(&mut self, ms: i64) -> DemoResult<()>;
    async fn screenshot(&mut self, path: &std::path::Path) -> DemoResult<()>;

    /// Start capturing a Playwright-style trace; not every driver supports
    /// this, so it defaults to a no-op.
    async fn start_tracing(&mut self) -> DemoResult<()> {
        Ok(())
    }

    async fn stop_tracing(&mut self, _path: &std::path::Path) -> DemoResult<()> {
        Ok(())
    }

    /// Path to the raw screen recording once the session is closed, if the
    /// driver captured one.
    fn video_path(&self) -> Option<PathBuf>;

    async fn close(&mut self) -> DemoResult<()>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// What happened during a fake-session run, for assertions in tests.
    #[derive(Debug, Default, Clone)]
    pub struct FakeCall {
        pub action: String,
        pub arg: Option<String>,
    }

    #[derive(Default)]
    pub struct FakeSession {
        pub calls: Arc<Mutex<Vec<FakeCall>>>,
        pub video_path: Option<PathBuf>,
        pub fail_action: Option<String>,
    }

    impl FakeSession {
        fn record(&self, action: &str, arg: Option<&str>) -> DemoResult<()> {
            self.calls.lock().unwrap().push(FakeCall {
                action: action.to_string(),
                arg: arg.map(|s| s.to_string()),
            });
            if self.fail_action.as_deref() == Some(action) {
                return Err(crate::error::DemoError::Session(format!("{action} failed")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn goto(&mut self, url: &str) -> DemoResult<()> {
            self.record("goto", Some(url))
        }
        async fn click(&mut self, selector: &str) -> DemoResult<()> {
            self.record("click", Some(selector))
        }
        async fn fill(&mut self, selector: &str, _value: &str) -> DemoResult<()> {
            self.record("fill", Some(selector))
        }
        async fn press(&mut self, key: &str) -> DemoResult<()> {
            self.record("press", Some(key))
        }
        async fn wait(&mut self, ms: i64) -> DemoResult<()> {
            self.record("wait", Some(&ms.to_string()))
        }
        async fn screenshot(&mut self, path: &std::path::Path) -> DemoResult<()> {
            self.record("screenshot", Some(&path.display().to_string()))
        }
        fn video_path(&self) -> Option<PathBuf> {
            self.video_path.clone()
        }
        async fn close(&mut self) -> DemoResult<()> {
            self.record("close", None)
        }
    }
}
