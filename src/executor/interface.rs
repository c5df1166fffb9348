use crate::error::{GatewayError, Result};
use crate::executor::command::MutationCommand;
use crate::executor::script;
use async_trait::async_trait;
use colored::*;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// 관리 인터페이스에 한 번에 넘기는 명령 묶음
#[derive(Debug, Clone)]
pub struct Batch {
    /// 준비 명령 (신뢰된 고정 문자열)
    pub prelude: Vec<String>,
    /// 도메인 명령 (제출 순서대로 실행)
    pub commands: Vec<MutationCommand>,
    /// 이미 있는 예약은 추가하지 않음
    pub skip_existing_reservations: bool,
}

impl Batch {
    pub fn render(&self) -> String {
        script::render_script(&self.prelude, &self.commands, self.skip_existing_reservations)
    }
}

/// 인터페이스가 돌려준 에러 기록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// 0은 준비 단계, 1부터는 `Batch::commands` 순서
    pub command_index: usize,
    pub message: String,
}

/// 제출 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub had_errors: bool,
    pub errors: Vec<ErrorRecord>,
}

impl Submission {
    pub fn from_errors(errors: Vec<ErrorRecord>) -> Self {
        Self {
            had_errors: !errors.is_empty(),
            errors,
        }
    }
}

/// DHCP 서버 관리 인터페이스
///
/// 배치 전체를 한 번의 호출로 받아서 순서대로 실행하고, 실패한 명령이
/// 있어도 나머지를 계속 실행해야 합니다.
#[async_trait]
pub trait ManagementInterface: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, batch: &Batch) -> Result<Submission>;
}

/// PowerShell DhcpServer 모듈을 통한 실제 서버 적용
///
/// 배치마다 powershell 프로세스 하나가 세션입니다. 프로세스 핸들이 drop되면
/// (타임아웃, 에러 포함) 프로세스도 종료됩니다.
pub struct PowerShellInterface {
    executable: String,
}

impl PowerShellInterface {
    pub fn new(executable: &str) -> Self {
        Self {
            executable: executable.to_string(),
        }
    }
}

#[async_trait]
impl ManagementInterface for PowerShellInterface {
    fn name(&self) -> &str {
        "powershell"
    }

    async fn submit(&self, batch: &Batch) -> Result<Submission> {
        let mut child = Command::new(&self.executable)
            .args(["-NoProfile", "-NonInteractive", "-Command", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::TransportError(format!("failed to start {}: {}", self.executable, e))
            })?;

        // 스크립트를 쓰는 동안 출력도 함께 읽어야 파이프가 가득 차도 멈추지 않음
        let script = batch.render();
        let stdin = child.stdin.take();
        let writer = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(script.as_bytes()).await?;
                stdin.write_all(b"\nexit\n").await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let (written, output) = tokio::join!(writer, child.wait_with_output());
        let output = output.map_err(|e| GatewayError::TransportError(e.to_string()))?;

        // 프로세스가 먼저 끝나 파이프가 닫힌 경우는 종료 상태로 판단
        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(GatewayError::TransportError(e.to_string()));
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let errors: Vec<ErrorRecord> = script::parse_error_lines(&stdout)
            .into_iter()
            .map(|(command_index, message)| ErrorRecord {
                command_index,
                message,
            })
            .collect();

        // 가드 밖에서 실패했다면 스크립트 자체가 돌지 못한 것
        if !output.status.success() && errors.is_empty() {
            return Err(GatewayError::TransportError(format!(
                "{} exited with {}: {}",
                self.executable,
                output.status,
                stderr.trim()
            )));
        }

        Ok(Submission::from_errors(errors))
    }
}

/// 스크립트만 출력하고 서버에는 접속하지 않음
pub struct DryRunInterface;

impl DryRunInterface {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DryRunInterface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManagementInterface for DryRunInterface {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn submit(&self, batch: &Batch) -> Result<Submission> {
        println!("{}", "# dry run: the following script would be submitted".dimmed());
        println!("{}", batch.render());
        Ok(Submission::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Batch {
        Batch {
            prelude: vec!["Import-Module DhcpServer".to_string()],
            commands: vec![MutationCommand::SetScopeGateway {
                scope_id: "10.0.0.0".to_string(),
                gateway: "10.0.0.1".to_string(),
            }],
            skip_existing_reservations: true,
        }
    }

    #[test]
    fn test_submission_from_errors() {
        assert!(!Submission::from_errors(vec![]).had_errors);

        let submission = Submission::from_errors(vec![ErrorRecord {
            command_index: 1,
            message: "Scope not found".to_string(),
        }]);
        assert!(submission.had_errors);
    }

    #[test]
    fn test_batch_render_contains_commands() {
        let script = batch().render();
        assert!(script.contains("Import-Module DhcpServer"));
        assert!(script.contains("-ScopeId '10.0.0.0' -OptionId 3 -Value '10.0.0.1'"));
    }

    #[tokio::test]
    async fn test_dry_run_reports_no_errors() {
        let interface = DryRunInterface::new();
        let submission = interface.submit(&batch()).await.unwrap();

        assert_eq!(interface.name(), "dry-run");
        assert_eq!(submission, Submission::default());
    }

    #[tokio::test]
    async fn test_missing_executable_is_transport_error() {
        let interface = PowerShellInterface::new("/nonexistent/dhcpgw-powershell");
        let result = interface.submit(&batch()).await;

        assert!(matches!(result, Err(GatewayError::TransportError(_))));
    }

    /// 실행 가능한 셸 스크립트로 powershell 대역 만들기
    #[cfg(unix)]
    fn fake_shell(dir: &tempfile::TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-powershell");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_large_batch_with_chatty_output_completes() {
        let dir = tempfile::tempdir().unwrap();
        let message = "x".repeat(200);
        let shell = fake_shell(
            &dir,
            &format!(
                "while IFS= read -r line; do echo '##dhcpgw-error##1##{}'; done",
                message
            ),
        );

        let commands: Vec<MutationCommand> = (0..3000)
            .map(|i| MutationCommand::SetScopeGateway {
                scope_id: format!("10.{}.{}.0", i / 256, i % 256),
                gateway: format!("10.{}.{}.1", i / 256, i % 256),
            })
            .collect();
        let batch = Batch {
            prelude: vec!["Import-Module DhcpServer".to_string()],
            commands,
            skip_existing_reservations: true,
        };

        let interface = PowerShellInterface::new(&shell);
        let submission =
            tokio::time::timeout(std::time::Duration::from_secs(30), interface.submit(&batch))
                .await
                .expect("submit did not finish")
                .unwrap();

        assert!(submission.had_errors);
        assert!(submission.errors.len() >= 3000);
        assert_eq!(submission.errors[0].message, message);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_session_without_markers_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let shell = fake_shell(&dir, "cat > /dev/null\necho 'DhcpServer module missing' >&2\nexit 3");

        let interface = PowerShellInterface::new(&shell);
        let err = interface.submit(&batch()).await.unwrap_err();

        match err {
            GatewayError::TransportError(message) => {
                assert!(message.contains("DhcpServer module missing"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_markers_are_mapped_to_records() {
        let dir = tempfile::tempdir().unwrap();
        let shell = fake_shell(
            &dir,
            "cat > /dev/null\necho 'noise'\necho '##dhcpgw-error##1##Scope not found'",
        );

        let interface = PowerShellInterface::new(&shell);
        let submission = interface.submit(&batch()).await.unwrap();

        assert_eq!(
            submission,
            Submission::from_errors(vec![ErrorRecord {
                command_index: 1,
                message: "Scope not found".to_string(),
            }])
        );
    }
}
