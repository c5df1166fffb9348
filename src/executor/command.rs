use crate::executor::validator::ValidEntry;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 예약 항목을 어떻게 적용할지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationProfile {
    /// 기존 예약의 IP에 게이트웨이 옵션만 덮어씀
    #[default]
    GatewayOverride,
    /// 스코프 안에 IP↔MAC 예약을 추가하고, 게이트웨이가 있으면 함께 설정
    Provision,
}

impl ReservationProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationProfile::GatewayOverride => "gateway-override",
            ReservationProfile::Provision => "provision",
        }
    }
}

/// 서버 상태를 바꾸는 명령 하나
///
/// 값은 검증을 통과한 그대로 들고 있고, 텍스트로 바꾸는 일은
/// `executor::script`에서만 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationCommand {
    SetScopeGateway {
        scope_id: String,
        gateway: String,
    },
    SetReservationGateway {
        ip_address: String,
        gateway: String,
    },
    AddReservation {
        scope_id: String,
        ip_address: String,
        client_id: String,
        name: Option<String>,
        description: Option<String>,
    },
}

impl MutationCommand {
    /// 진행 로그용 설명
    pub fn description(&self) -> String {
        match self {
            MutationCommand::SetScopeGateway { scope_id, gateway } => {
                format!("Updating scope '{}' with new gateway '{}'", scope_id, gateway)
            }
            MutationCommand::SetReservationGateway { ip_address, gateway } => {
                format!(
                    "Updating reservation '{}' with new gateway '{}'",
                    ip_address, gateway
                )
            }
            MutationCommand::AddReservation {
                scope_id,
                ip_address,
                client_id,
                ..
            } => format!(
                "Adding reservation '{}' ({}) to scope '{}'",
                ip_address, client_id, scope_id
            ),
        }
    }

    pub fn is_reservation_add(&self) -> bool {
        matches!(self, MutationCommand::AddReservation { .. })
    }
}

impl fmt::Display for MutationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// 검증된 항목을 명령으로 변환 (서버와 통신하지 않음)
pub struct CommandBuilder;

impl CommandBuilder {
    /// 항목 하나를 명령으로 변환
    ///
    /// 예약 추가 항목에 게이트웨이가 있으면 같은 배치 안에서
    /// 추가 명령 바로 뒤에 게이트웨이 명령이 따라옵니다.
    pub fn build(entry: &ValidEntry) -> Vec<MutationCommand> {
        match entry {
            ValidEntry::Scope { scope_id, gateway } => vec![MutationCommand::SetScopeGateway {
                scope_id: scope_id.clone(),
                gateway: gateway.clone(),
            }],
            ValidEntry::ReservationGateway {
                ip_address,
                gateway,
            } => vec![MutationCommand::SetReservationGateway {
                ip_address: ip_address.clone(),
                gateway: gateway.clone(),
            }],
            ValidEntry::ReservationProvision {
                scope_id,
                ip_address,
                client_id,
                name,
                description,
                gateway,
            } => {
                let mut commands = vec![MutationCommand::AddReservation {
                    scope_id: scope_id.clone(),
                    ip_address: ip_address.clone(),
                    client_id: client_id.clone(),
                    name: name.clone(),
                    description: description.clone(),
                }];

                if let Some(gateway) = gateway {
                    commands.push(MutationCommand::SetReservationGateway {
                        ip_address: ip_address.clone(),
                        gateway: gateway.clone(),
                    });
                }

                commands
            }
        }
    }

    /// 여러 항목을 순서대로 변환
    pub fn build_all(entries: &[ValidEntry]) -> Vec<MutationCommand> {
        entries.iter().flat_map(Self::build).collect()
    }
}
