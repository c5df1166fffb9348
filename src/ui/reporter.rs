use crate::error::GatewayError;
use crate::executor::{ExecutionResult, MutationCommand, SkippedEntry};
use crate::ui::progress::create_spinner;
use colored::*;
use indicatif::ProgressBar;

pub const SUCCESS_LINE: &str = "Commands executed successfully.";
pub const FAILURE_LINE: &str = "Error while executing commands.";

/// 파이프라인이 보고하는 이벤트
#[derive(Debug)]
pub enum ReportEvent<'a> {
    /// 설정 파일에 섹션이 없음 (해당 항목은 할 일 없음)
    SectionMissing(&'a str),
    /// 명령이 배치에 추가됨
    Queued(&'a MutationCommand),
    /// 검증에 실패해서 건너뜀
    Skipped(&'a SkippedEntry),
    /// 인터페이스에 제출 시작
    BatchStarted { commands: usize, interface: &'a str },
    /// 배치 실행 완료
    Finished(&'a ExecutionResult),
    /// 실행 중단
    Aborted(&'a GatewayError),
}

impl ReportEvent<'_> {
    /// 색 없는 메시지 (이벤트 하나가 여러 줄일 수 있음)
    pub fn lines(&self) -> Vec<String> {
        match self {
            ReportEvent::SectionMissing(section) => vec![format!(
                "No '{}' section in settings, nothing to do for it.",
                section
            )],
            ReportEvent::Queued(command) => vec![command.description()],
            ReportEvent::Skipped(entry) => vec![format!(
                "Skipping {} '{}': {}",
                entry.kind.as_str(),
                entry.label,
                entry.reason
            )],
            ReportEvent::BatchStarted {
                commands,
                interface,
            } => vec![format!(
                "Submitting {} command(s) via {}...",
                commands, interface
            )],
            ReportEvent::Finished(result) => {
                if result.succeeded {
                    vec![SUCCESS_LINE.to_string()]
                } else {
                    let mut lines = vec![FAILURE_LINE.to_string()];
                    lines.extend(result.errors.iter().cloned());
                    lines
                }
            }
            ReportEvent::Aborted(error) => vec![format!("An error occurred: {}", error)],
        }
    }
}

/// 진행 상황과 결과를 사용자에게 보여주는 쪽
///
/// 표시만 담당하고 실행 흐름에는 영향을 주지 않습니다.
pub trait Reporter {
    fn report(&mut self, event: ReportEvent<'_>);
}

/// 터미널 출력
pub struct ConsoleReporter {
    debug: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            spinner: None,
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: ReportEvent<'_>) {
        let lines = event.lines();

        match &event {
            ReportEvent::SectionMissing(_) => {
                eprintln!("{} {}", "[i]".cyan(), lines[0].dimmed());
            }
            ReportEvent::Queued(_) => {
                eprintln!("  {} {}", "▶".cyan(), lines[0]);
            }
            ReportEvent::Skipped(_) => {
                eprintln!("  {} {}", "[!]".yellow(), lines[0].yellow());
            }
            ReportEvent::BatchStarted { interface, .. } => {
                eprintln!("\n{} {}", "[*]".cyan().bold(), lines[0]);
                if *interface != "dry-run" {
                    self.spinner = Some(create_spinner("Waiting for the DHCP server..."));
                }
            }
            ReportEvent::Finished(result) => {
                self.stop_spinner();

                if result.succeeded {
                    println!("{} {}", "[OK]".green().bold(), lines[0].green());
                } else {
                    println!("{} {}", "[X]".red().bold(), lines[0].red());
                    for message in &lines[1..] {
                        println!("  - {}", message.red());
                    }
                }

                if self.debug {
                    eprintln!(
                        "{} {} command(s), {}ms, finished at {}",
                        "DEBUG:".yellow(),
                        result.attempted,
                        result.duration_ms,
                        result.finished_at.to_rfc3339()
                    );
                    for failure in &result.failures {
                        eprintln!(
                            "{} #{} {}: {}",
                            "DEBUG:".yellow(),
                            failure.command_index,
                            failure.description,
                            failure.message
                        );
                    }
                }
            }
            ReportEvent::Aborted(_) => {
                self.stop_spinner();
                eprintln!("{} {}", "[X]".red().bold(), lines[0].red());
            }
        }
    }
}

/// 출력 대신 줄을 모아두는 리포터 (테스트, 임베딩용)
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub lines: Vec<String>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, event: ReportEvent<'_>) {
        self.lines.extend(event.lines());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::validator::EntryKind;

    #[test]
    fn test_queued_line() {
        let command = MutationCommand::SetScopeGateway {
            scope_id: "10.0.0.0".to_string(),
            gateway: "10.0.0.1".to_string(),
        };

        let mut reporter = MemoryReporter::new();
        reporter.report(ReportEvent::Queued(&command));

        assert_eq!(
            reporter.lines,
            vec!["Updating scope '10.0.0.0' with new gateway '10.0.0.1'"]
        );
    }

    #[test]
    fn test_skipped_line() {
        let entry = SkippedEntry {
            kind: EntryKind::Reservation,
            label: "10.0.0.5".to_string(),
            reason: "missing gateway".to_string(),
        };

        let mut reporter = MemoryReporter::new();
        reporter.report(ReportEvent::Skipped(&entry));

        assert_eq!(
            reporter.lines,
            vec!["Skipping reservation '10.0.0.5': missing gateway"]
        );
    }

    #[test]
    fn test_finished_lines() {
        let mut result = ExecutionResult::empty();

        let mut reporter = MemoryReporter::new();
        reporter.report(ReportEvent::Finished(&result));
        assert_eq!(reporter.lines, vec![SUCCESS_LINE]);

        result.succeeded = false;
        result.errors = vec!["Scope not found".to_string(), "Access denied".to_string()];

        let mut reporter = MemoryReporter::new();
        reporter.report(ReportEvent::Finished(&result));
        assert_eq!(
            reporter.lines,
            vec![FAILURE_LINE, "Scope not found", "Access denied"]
        );
    }

    #[test]
    fn test_aborted_line() {
        let error = GatewayError::SelectionError("7".to_string());

        let mut reporter = MemoryReporter::new();
        reporter.report(ReportEvent::Aborted(&error));

        assert!(reporter.contains("An error occurred: Unknown operation '7'"));
    }

    #[test]
    fn test_console_reporter_does_not_panic() {
        let mut reporter = ConsoleReporter::new(true);
        reporter.report(ReportEvent::SectionMissing("Scopes"));
        reporter.report(ReportEvent::Finished(&ExecutionResult::empty()));
    }
}
