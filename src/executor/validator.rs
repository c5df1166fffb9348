use crate::error::{GatewayError, Result};
use crate::executor::command::ReservationProfile;
use crate::settings::{non_empty, Reservation, Scope};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;

/// 6옥텟 MAC (`:`/`-` 구분 또는 구분자 없는 16진수)
static MAC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$|^[0-9A-Fa-f]{12}$").unwrap()
});

/// 검증을 통과한 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidEntry {
    Scope {
        scope_id: String,
        gateway: String,
    },
    ReservationGateway {
        ip_address: String,
        gateway: String,
    },
    ReservationProvision {
        scope_id: String,
        ip_address: String,
        client_id: String,
        name: Option<String>,
        description: Option<String>,
        gateway: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Scope,
    Reservation,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Scope => "scope",
            EntryKind::Reservation => "reservation",
        }
    }
}

/// 건너뛴 항목과 이유
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub kind: EntryKind,
    pub label: String,
    pub reason: String,
}

/// 필터 결과
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub valid: Vec<ValidEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl ValidationReport {
    pub fn merge(&mut self, other: ValidationReport) {
        self.valid.extend(other.valid);
        self.skipped.extend(other.skipped);
    }
}

/// 선언된 항목을 검사해서 불완전하거나 위험한 항목을 걸러냄
pub struct EntryValidator;

impl EntryValidator {
    /// 이름/설명 같은 자유 텍스트에 허용하지 않는 문자
    ///
    /// PowerShell은 유니코드 따옴표도 문자열 구분자로 인식합니다.
    const FREE_TEXT_FORBIDDEN: &'static [char] = &[
        '\'', '"', '`', ';', '$', '\r', '\n', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}',
        '\u{201C}', '\u{201D}', '\u{201E}',
    ];

    pub fn new() -> Self {
        Self
    }

    /// 스코프 목록 필터링 (입력은 변경하지 않음)
    pub fn filter_scopes(&self, scopes: &[Scope]) -> ValidationReport {
        let mut report = ValidationReport::default();

        for scope in scopes {
            match self.check_scope(scope) {
                Ok(entry) => report.valid.push(entry),
                Err(e) => report.skipped.push(SkippedEntry {
                    kind: EntryKind::Scope,
                    label: scope.label(),
                    reason: reason(e),
                }),
            }
        }

        report
    }

    /// 예약 목록 필터링
    pub fn filter_reservations(
        &self,
        reservations: &[Reservation],
        profile: ReservationProfile,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        for reservation in reservations {
            match self.check_reservation(reservation, profile) {
                Ok(entry) => report.valid.push(entry),
                Err(e) => report.skipped.push(SkippedEntry {
                    kind: EntryKind::Reservation,
                    label: reservation.label(),
                    reason: reason(e),
                }),
            }
        }

        report
    }

    pub fn check_scope(&self, scope: &Scope) -> Result<ValidEntry> {
        let scope_id = required(&scope.id, "scope id")?;
        let gateway = required(&scope.gateway, "gateway")?;

        ipv4(scope_id, "scope id")?;
        ipv4(gateway, "gateway")?;

        Ok(ValidEntry::Scope {
            scope_id: scope_id.to_string(),
            gateway: gateway.to_string(),
        })
    }

    pub fn check_reservation(
        &self,
        reservation: &Reservation,
        profile: ReservationProfile,
    ) -> Result<ValidEntry> {
        match profile {
            ReservationProfile::GatewayOverride => {
                let ip_address = required(&reservation.ip_address, "ip address")?;
                let gateway = required(&reservation.gateway, "gateway")?;

                ipv4(ip_address, "ip address")?;
                ipv4(gateway, "gateway")?;

                Ok(ValidEntry::ReservationGateway {
                    ip_address: ip_address.to_string(),
                    gateway: gateway.to_string(),
                })
            }
            ReservationProfile::Provision => {
                let scope_id = required(&reservation.scope_id, "scope id")?;
                let ip_address = required(&reservation.ip_address, "ip address")?;
                let client_id = required(&reservation.client_id, "client id")?;

                ipv4(scope_id, "scope id")?;
                ipv4(ip_address, "ip address")?;
                mac(client_id)?;

                let gateway = match non_empty(&reservation.gateway) {
                    Some(gateway) => Some(ipv4(gateway, "gateway")?.to_string()),
                    None => None,
                };

                Ok(ValidEntry::ReservationProvision {
                    scope_id: scope_id.to_string(),
                    ip_address: ip_address.to_string(),
                    client_id: client_id.to_string(),
                    name: self.free_text(&reservation.name, "name")?,
                    description: self.free_text(&reservation.description, "description")?,
                    gateway,
                })
            }
        }
    }

    fn free_text(&self, value: &Option<String>, field: &str) -> Result<Option<String>> {
        let Some(text) = non_empty(value) else {
            return Ok(None);
        };

        if let Some(c) = text.chars().find(|c| Self::FREE_TEXT_FORBIDDEN.contains(c)) {
            return Err(GatewayError::ValidationError(format!(
                "{} contains forbidden character {:?}",
                field, c
            )));
        }

        Ok(Some(text.to_string()))
    }
}

impl Default for EntryValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    non_empty(value).ok_or_else(|| GatewayError::ValidationError(format!("missing {}", field)))
}

fn ipv4<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    value.parse::<Ipv4Addr>().map(|_| value).map_err(|_| {
        GatewayError::ValidationError(format!(
            "{} '{}' is not a dotted-decimal IPv4 address",
            field,
            value.escape_debug()
        ))
    })
}

fn mac(value: &str) -> Result<&str> {
    if MAC_REGEX.is_match(value) {
        Ok(value)
    } else {
        Err(GatewayError::ValidationError(format!(
            "client id '{}' is not a MAC address",
            value.escape_debug()
        )))
    }
}

fn reason(error: GatewayError) -> String {
    match error {
        GatewayError::ValidationError(reason) => reason,
        other => other.to_string(),
    }
}
