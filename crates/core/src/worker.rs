//! Background dispatch of a single conversion.
//!
//! A graphical shell keeps its event loop responsive by handing the request
//! to [`spawn`] and polling the returned handle. The router itself stays a
//! plain synchronous call.

use crate::error::{Error, Result};
use crate::router::{ConversionReport, Router};
use crate::types::ConversionRequest;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handle to a conversion running on a background thread.
#[derive(Debug)]
pub struct ConversionHandle {
    receiver: Receiver<Result<ConversionReport>>,
    thread: Option<JoinHandle<()>>,
}

/// Run `request` on a new thread.
pub fn spawn(router: Arc<Router>, request: ConversionRequest) -> std::io::Result<ConversionHandle> {
    let (sender, receiver) = mpsc::channel();

    let thread = thread::Builder::new()
        .name("fconv-conversion".to_string())
        .spawn(move || {
            let result = router.execute(&request);
            // The receiver may already be gone if the caller lost interest.
            let _ = sender.send(result);
        })?;

    Ok(ConversionHandle {
        receiver,
        thread: Some(thread),
    })
}

impl ConversionHandle {
    /// Poll for the outcome without blocking.
    ///
    /// Returns `None` while the conversion is still running. After the
    /// outcome has been returned once, further calls report
    /// [`Error::WorkerStopped`].
    pub fn try_result(&mut self) -> Option<Result<ConversionReport>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(Error::WorkerStopped))
            }
        }
    }

    /// Block until the conversion finishes.
    pub fn wait(mut self) -> Result<ConversionReport> {
        let result = self.receiver.recv().unwrap_or(Err(Error::WorkerStopped));
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Conversion worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;
    use crate::router::{Adapter, ConversionJob, ConversionMethod};
    use crate::rules::ConversionRules;
    use crate::types::FormatCategory;
    use std::time::Duration;

    struct TouchAdapter;

    impl Adapter for TouchAdapter {
        fn convert(&self, job: &ConversionJob<'_>) -> std::result::Result<(), AdapterError> {
            std::fs::write(job.output, b"ok")?;
            Ok(())
        }
    }

    struct PanickingAdapter;

    impl Adapter for PanickingAdapter {
        fn convert(&self, _job: &ConversionJob<'_>) -> std::result::Result<(), AdapterError> {
            panic!("adapter bug");
        }
    }

    #[test]
    fn test_wait_returns_report() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.png");
        std::fs::write(&source, b"png").unwrap();
        let router = Arc::new(
            Router::new(ConversionRules::default()).with_adapter(FormatCategory::Image, TouchAdapter),
        );

        let handle = spawn(router, ConversionRequest::new(&source, dir.path().join("a.bmp"), "BMP")).unwrap();
        let report = handle.wait().unwrap();

        assert_eq!(report.method, ConversionMethod::Converted(FormatCategory::Image));
        assert!(dir.path().join("a.bmp").exists());
    }

    #[test]
    fn test_try_result_polls_until_done() {
        let dir = tempfile::tempdir().unwrap();
        let router = Arc::new(Router::new(ConversionRules::default()));
        let request = ConversionRequest::new(dir.path().join("missing.png"), dir.path().join("x.jpg"), "JPG");

        let mut handle = spawn(router, request).unwrap();
        let result = loop {
            if let Some(result) = handle.try_result() {
                break result;
            }
            std::thread::sleep(Duration::from_millis(5));
        };

        assert!(matches!(result, Err(Error::SourceNotFound(_))));
        assert!(matches!(handle.try_result(), Some(Err(Error::WorkerStopped))));
    }

    #[test]
    fn test_panicking_adapter_reports_worker_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.png");
        std::fs::write(&source, b"png").unwrap();
        let router = Arc::new(
            Router::new(ConversionRules::default()).with_adapter(FormatCategory::Image, PanickingAdapter),
        );

        let handle = spawn(router, ConversionRequest::new(&source, dir.path().join("a.gif"), "GIF")).unwrap();
        assert!(matches!(handle.wait(), Err(Error::WorkerStopped)));
    }
}
