use crate::error::{GatewayError, Result};
use crate::settings::{DhcpSettings, Reservation, Scope};
use std::fmt;
use std::str::FromStr;

/// 실행할 작업 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// 선언된 스코프와 예약 모두 적용
    ApplyAll,
    ScopesOnly,
    ReservationsOnly,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::ApplyAll,
        Operation::ScopesOnly,
        Operation::ReservationsOnly,
    ];

    /// 메뉴 번호
    pub fn menu_number(&self) -> u8 {
        match self {
            Operation::ApplyAll => 1,
            Operation::ScopesOnly => 2,
            Operation::ReservationsOnly => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::ApplyAll => "Apply all declared scopes and reservations",
            Operation::ScopesOnly => "Update scope gateways only",
            Operation::ReservationsOnly => "Update reservations only",
        }
    }

    fn includes_scopes(&self) -> bool {
        matches!(self, Operation::ApplyAll | Operation::ScopesOnly)
    }

    fn includes_reservations(&self) -> bool {
        matches!(self, Operation::ApplyAll | Operation::ReservationsOnly)
    }
}

impl FromStr for Operation {
    type Err = GatewayError;

    fn from_str(token: &str) -> Result<Self> {
        match token.trim().to_lowercase().as_str() {
            "1" | "all" => Ok(Operation::ApplyAll),
            "2" | "scopes" => Ok(Operation::ScopesOnly),
            "3" | "reservations" => Ok(Operation::ReservationsOnly),
            _ => Err(GatewayError::SelectionError(token.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.menu_number(), self.label())
    }
}

/// 선택된 작업이 다룰 항목들
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub scopes: Vec<Scope>,
    /// 최상위 `Reservations` (설정된 프로필로 처리)
    pub reservations: Vec<Reservation>,
    /// 스코프 안에 중첩된 예약 (항상 추가 프로필로 처리)
    pub nested_reservations: Vec<Reservation>,
    /// 설정 파일에 없는 섹션 이름
    pub missing_sections: Vec<&'static str>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty() && self.reservations.is_empty() && self.nested_reservations.is_empty()
    }
}

/// 작업 종류에 따라 처리할 항목을 고름
pub struct OperationSelector;

impl OperationSelector {
    /// 메뉴 입력이나 CLI 인자를 받아서 선택
    pub fn select_token(token: &str, settings: &DhcpSettings) -> Result<Selection> {
        let operation: Operation = token.parse()?;
        Ok(Self::select(operation, settings))
    }

    pub fn select(operation: Operation, settings: &DhcpSettings) -> Selection {
        let mut selection = Selection::default();

        if operation.includes_scopes() {
            match &settings.scopes {
                Some(scopes) => selection.scopes = scopes.clone(),
                None => selection.missing_sections.push("Scopes"),
            }
        }

        if operation.includes_reservations() {
            match &settings.reservations {
                Some(reservations) => selection.reservations = reservations.clone(),
                None => selection.missing_sections.push("Reservations"),
            }

            if let Some(scopes) = &settings.scopes {
                selection.nested_reservations = scopes
                    .iter()
                    .flat_map(|scope| scope.nested_reservations())
                    .collect();
            }
        }

        selection
    }
}
