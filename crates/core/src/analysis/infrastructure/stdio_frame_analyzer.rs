use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use thiserror::Error;

use crate::analysis::domain::analysis_result::AnalysisResult;
use crate::analysis::domain::frame_analyzer::FrameAnalyzer;
use crate::shared::frame::Frame;
use crate::shared::screen_color::ScreenColor;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("failed to start analysis engine {program:?}: {source}")]
    Spawn {
        program: OsString,
        #[source]
        source: std::io::Error,
    },
    #[error("analysis engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("analysis engine closed its output")]
    Closed,
    #[error("analysis engine sent an unreadable response: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("analysis engine is no longer running")]
    Unavailable,
}

impl AnalyzerError {
    /// Whether the engine process can no longer be talked to.
    fn is_fatal(&self) -> bool {
        !matches!(self, AnalyzerError::Protocol(_))
    }
}

/// Raw pixels as they travel to the engine.
#[derive(Serialize)]
struct WireImage {
    width: u32,
    height: u32,
    channels: u8,
    data: String,
}

impl From<&Frame> for WireImage {
    fn from(frame: &Frame) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            channels: frame.channels(),
            data: STANDARD.encode(frame.data()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineRequest<'a> {
    screen_color: &'a ScreenColor,
    forehead: WireImage,
    frame: WireImage,
}

struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Talks to an out-of-process analysis engine over stdin/stdout, one
/// JSON object per line in each direction.
///
/// The engine is started on first use and kept for the lifetime of the
/// analyzer. Once it dies or misbehaves at the I/O level it is not
/// restarted; every later frame is reported as excluded.
pub struct StdioFrameAnalyzer {
    program: OsString,
    args: Vec<OsString>,
    process: Option<EngineProcess>,
    dead: bool,
}

impl StdioFrameAnalyzer {
    pub fn new<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            process: None,
            dead: false,
        }
    }

    /// Starts the engine now instead of on the first frame, surfacing
    /// a bad command line before any work is done.
    pub fn start(&mut self) -> Result<(), AnalyzerError> {
        self.process().map(|_| ())
    }

    fn process(&mut self) -> Result<&mut EngineProcess, AnalyzerError> {
        if self.dead {
            return Err(AnalyzerError::Unavailable);
        }
        if self.process.is_none() {
            self.process = Some(self.spawn()?);
        }
        self.process.as_mut().ok_or(AnalyzerError::Unavailable)
    }

    fn spawn(&self) -> Result<EngineProcess, AnalyzerError> {
        let spawn_err = |source: std::io::Error| AnalyzerError::Spawn {
            program: self.program.clone(),
            source,
        };
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AnalyzerError::Unavailable);
        };
        log::info!("Started analysis engine {:?} (pid {})", self.program, child.id());
        Ok(EngineProcess {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn request(
        &mut self,
        forehead: &Frame,
        frame: &Frame,
        screen_color: &ScreenColor,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let request = EngineRequest {
            screen_color,
            forehead: WireImage::from(forehead),
            frame: WireImage::from(frame),
        };
        let process = self.process()?;

        let mut line = serde_json::to_vec(&request)?;
        line.push(b'\n');
        process.stdin.write_all(&line)?;
        process.stdin.flush()?;

        let mut response = String::new();
        if process.stdout.read_line(&mut response)? == 0 {
            return Err(AnalyzerError::Closed);
        }
        Ok(serde_json::from_str(response.trim())?)
    }

    fn shutdown(&mut self) {
        if let Some(mut process) = self.process.take() {
            drop(process.stdin);
            let _ = process.child.kill();
            let _ = process.child.wait();
        }
    }
}

impl FrameAnalyzer for StdioFrameAnalyzer {
    fn analyze(
        &mut self,
        forehead: &Frame,
        frame: &Frame,
        screen_color: &ScreenColor,
    ) -> AnalysisResult {
        match self.request(forehead, frame, screen_color) {
            Ok(result) => result,
            Err(AnalyzerError::Unavailable) => AnalysisResult::excluded(),
            Err(e) => {
                log::warn!("Analysis of frame {} failed: {e}", frame.index());
                if e.is_fatal() {
                    self.shutdown();
                    self.dead = true;
                }
                AnalysisResult::excluded()
            }
        }
    }
}

impl Drop for StdioFrameAnalyzer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(index: usize) -> Frame {
        Frame::new(vec![90; 4 * 4 * 3], 4, 4, 3, index)
    }

    fn shell(script: &str) -> StdioFrameAnalyzer {
        StdioFrameAnalyzer::new("sh", ["-c", script])
    }

    const ECHO_ENGINE: &str = r#"while IFS= read -r line; do
        echo '{"confidence": 55.5, "signal_quality": 0.7, "details": {"sss_ratio": 1.1, "chroma_passed": true, "moire_score": 0.02}}'
    done"#;

    #[test]
    fn test_round_trip_with_engine_process() {
        let mut analyzer = shell(ECHO_ENGINE);
        for i in 0..3 {
            let result = analyzer.analyze(&frame(i), &frame(i), &ScreenColor::White);
            assert_relative_eq!(result.confidence, 55.5);
            assert_relative_eq!(result.signal_quality, 0.7);
            assert!(result.details.chroma_passed);
        }
    }

    #[test]
    fn test_request_carries_screen_color() {
        let mut analyzer = shell(
            r#"while IFS= read -r line; do
                case "$line" in
                    *'"screenColor":"RED"'*) echo '{"confidence": 70}' ;;
                    *) echo '{"confidence": 0}' ;;
                esac
            done"#,
        );
        let red = analyzer.analyze(&frame(0), &frame(0), &ScreenColor::Red);
        let white = analyzer.analyze(&frame(1), &frame(1), &ScreenColor::White);
        assert_relative_eq!(red.confidence, 70.0);
        assert!(!white.is_usable());
    }

    #[test]
    fn test_empty_forehead_is_sent_as_zero_sized_image() {
        let mut analyzer = shell(
            r#"while IFS= read -r line; do
                case "$line" in
                    *'"forehead":{"width":0,"height":0,"channels":3,"data":""}'*) echo '{"confidence": 1}' ;;
                    *) echo '{"confidence": 0}' ;;
                esac
            done"#,
        );
        let result = analyzer.analyze(&Frame::empty(3, 0), &frame(0), &ScreenColor::White);
        assert!(result.is_usable());
    }

    #[test]
    fn test_full_frame_is_sent_alongside_forehead() {
        let mut analyzer = shell(
            r#"while IFS= read -r line; do
                case "$line" in
                    *'"frame":{"width":8,"height":6,'*) echo '{"confidence": 3}' ;;
                    *) echo '{"confidence": 0}' ;;
                esac
            done"#,
        );
        let full = Frame::new(vec![10; 8 * 6 * 3], 8, 6, 3, 0);
        let forehead = full.crop(2, 0, 4, 2);

        let result = analyzer.analyze(&forehead, &full, &ScreenColor::White);

        assert_relative_eq!(result.confidence, 3.0);
    }

    #[test]
    fn test_missing_program_excludes_frame() {
        let mut analyzer = StdioFrameAnalyzer::new("/nonexistent/engine", Vec::<String>::new());
        assert!(matches!(analyzer.start(), Err(AnalyzerError::Spawn { .. })));
        let result = analyzer.analyze(&frame(0), &frame(0), &ScreenColor::White);
        assert!(!result.is_usable());
    }

    #[test]
    fn test_engine_that_exits_is_not_restarted() {
        let mut analyzer = shell("exit 0");
        assert!(!analyzer
            .analyze(&frame(0), &frame(0), &ScreenColor::White)
            .is_usable());
        assert!(analyzer.dead);
        assert!(matches!(analyzer.start(), Err(AnalyzerError::Unavailable)));
    }

    #[test]
    fn test_garbage_response_excludes_only_that_frame() {
        let mut analyzer = shell(
            r#"n=0
            while IFS= read -r line; do
                n=$((n + 1))
                if [ "$n" -eq 1 ]; then echo 'not json'; else echo '{"confidence": 42}'; fi
            done"#,
        );
        let first = analyzer.analyze(&frame(0), &frame(0), &ScreenColor::White);
        let second = analyzer.analyze(&frame(1), &frame(1), &ScreenColor::White);
        assert!(!first.is_usable());
        assert_relative_eq!(second.confidence, 42.0);
    }
}
