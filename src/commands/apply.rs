use crate::error::Result;
use crate::executor::validator::ValidationReport;
use crate::executor::{
    BatchExecutor, CommandBuilder, EntryValidator, ExecutionResult, MutationCommand,
    ReservationProfile, SkippedEntry,
};
use crate::operation::{OperationSelector, Selection};
use crate::settings::DhcpSettings;
use crate::ui::{ReportEvent, Reporter};

/// 검증과 변환을 거친 실행 계획
#[derive(Debug, Default)]
pub struct Plan {
    pub commands: Vec<MutationCommand>,
    pub skipped: Vec<SkippedEntry>,
}

/// 한 번 실행한 결과 요약
#[derive(Debug)]
pub struct RunSummary {
    pub queued: usize,
    pub skipped: usize,
    pub result: ExecutionResult,
}

impl RunSummary {
    /// 0: 성공, 1: 실행 실패, 2: 실행은 성공했지만 건너뛴 항목 있음
    pub fn exit_code(&self) -> u8 {
        if !self.result.succeeded {
            1
        } else if self.skipped > 0 {
            2
        } else {
            0
        }
    }
}

/// 선택된 항목을 검증하고 명령으로 변환 (서버와 통신하지 않음)
pub fn plan(selection: &Selection, profile: ReservationProfile) -> Plan {
    let validator = EntryValidator::new();

    let mut report = ValidationReport::default();
    report.merge(validator.filter_scopes(&selection.scopes));
    report.merge(validator.filter_reservations(&selection.reservations, profile));
    report.merge(
        validator.filter_reservations(&selection.nested_reservations, ReservationProfile::Provision),
    );

    Plan {
        commands: CommandBuilder::build_all(&report.valid),
        skipped: report.skipped,
    }
}

/// 선택 → 검증 → 변환 → 실행 → 보고
pub async fn apply(
    selection: &Selection,
    profile: ReservationProfile,
    executor: &BatchExecutor,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary> {
    for section in &selection.missing_sections {
        reporter.report(ReportEvent::SectionMissing(section));
    }

    let plan = plan(selection, profile);

    for entry in &plan.skipped {
        reporter.report(ReportEvent::Skipped(entry));
    }
    for command in &plan.commands {
        reporter.report(ReportEvent::Queued(command));
    }

    let queued = plan.commands.len();
    if queued > 0 {
        reporter.report(ReportEvent::BatchStarted {
            commands: queued,
            interface: executor.interface_name(),
        });
    }

    let result = executor.execute(plan.commands).await?;
    reporter.report(ReportEvent::Finished(&result));

    Ok(RunSummary {
        queued,
        skipped: plan.skipped.len(),
        result,
    })
}

/// 작업 토큰으로 전체 파이프라인 실행
///
/// 알 수 없는 토큰이면 명령을 만들지 않고 `SelectionError`를 반환합니다.
pub async fn run_operation(
    token: &str,
    settings: &DhcpSettings,
    profile: ReservationProfile,
    executor: &BatchExecutor,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary> {
    let selection = OperationSelector::select_token(token, settings)?;
    apply(&selection, profile, executor, reporter).await
}
