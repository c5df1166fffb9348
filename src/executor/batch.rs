use crate::error::{GatewayError, Result};
use crate::executor::command::MutationCommand;
use crate::executor::interface::{Batch, ManagementInterface, Submission};
use crate::executor::script::SETUP_PRELUDE;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 실패한 명령 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// 0은 준비 단계, 1부터는 제출 순서
    pub command_index: usize,
    /// 명령 설명 (준비 단계면 "session setup")
    pub description: String,
    pub message: String,
}

/// 배치 실행 결과
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// 에러가 하나도 없었는지
    pub succeeded: bool,
    /// 인터페이스가 보고한 에러 메시지 (보고 순서 유지)
    pub errors: Vec<String>,
    /// 명령별 실패 정보
    pub failures: Vec<CommandFailure>,
    /// 제출한 도메인 명령 수
    pub attempted: usize,
    /// 실행 시간 (밀리초)
    pub duration_ms: u128,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    /// 아무것도 제출하지 않은 경우
    pub fn empty() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
            failures: Vec::new(),
            attempted: 0,
            duration_ms: 0,
            finished_at: Utc::now(),
        }
    }

    /// 인터페이스 응답을 결과로 변환
    pub fn from_submission(
        commands: &[MutationCommand],
        submission: Submission,
        duration_ms: u128,
    ) -> Self {
        let failures: Vec<CommandFailure> = submission
            .errors
            .into_iter()
            .map(|record| CommandFailure {
                description: match record.command_index {
                    0 => "session setup".to_string(),
                    idx => commands
                        .get(idx - 1)
                        .map(|c| c.description())
                        .unwrap_or_else(|| format!("command {}", idx)),
                },
                command_index: record.command_index,
                message: record.message,
            })
            .collect();

        Self {
            succeeded: !submission.had_errors && failures.is_empty(),
            errors: failures.iter().map(|f| f.message.clone()).collect(),
            failures,
            attempted: commands.len(),
            duration_ms,
            finished_at: Utc::now(),
        }
    }
}

/// 명령을 모아 관리 인터페이스에 한 번에 제출
pub struct BatchExecutor {
    interface: Arc<dyn ManagementInterface>,
    prelude: Vec<String>,
    skip_existing_reservations: bool,
    timeout: Option<Duration>,
}

impl BatchExecutor {
    pub fn new(interface: Arc<dyn ManagementInterface>) -> Self {
        Self {
            interface,
            prelude: SETUP_PRELUDE.iter().map(|s| s.to_string()).collect(),
            skip_existing_reservations: true,
            timeout: None,
        }
    }

    pub fn with_skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing_reservations = skip;
        self
    }

    /// 서버 응답 제한 시간 (None이면 무제한)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interface_name(&self) -> &str {
        self.interface.name()
    }

    /// 배치 실행
    ///
    /// 명령이 없으면 인터페이스를 호출하지 않습니다. 중간 명령이 실패해도
    /// 이전 명령은 되돌리지 않고 나머지도 계속 실행됩니다.
    pub async fn execute(&self, commands: Vec<MutationCommand>) -> Result<ExecutionResult> {
        if commands.is_empty() {
            return Ok(ExecutionResult::empty());
        }

        let start_time = Instant::now();
        let batch = Batch {
            prelude: self.prelude.clone(),
            commands,
            skip_existing_reservations: self.skip_existing_reservations,
        };

        let submission = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.interface.submit(&batch))
                .await
                .map_err(|_| GatewayError::Timeout(limit.as_secs()))??,
            None => self.interface.submit(&batch).await?,
        };

        Ok(ExecutionResult::from_submission(
            &batch.commands,
            submission,
            start_time.elapsed().as_millis(),
        ))
    }
}
