use crate::config::Config;
use crate::executor::ReservationProfile;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dhcpgw")]
#[command(version)]
#[command(about = "Apply declared gateway options to DHCP scopes and reservations", long_about = None)]
pub struct Cli {
    /// 작업 선택 (1/all, 2/scopes, 3/reservations). 미지정시 메뉴 표시
    #[arg(short = 'o', long)]
    pub operation: Option<String>,

    /// DhcpSettings JSON 파일 경로. 미지정시 설정 파일의 settings_path 사용
    #[arg(short = 's', long)]
    pub settings: Option<PathBuf>,

    /// 최상위 Reservations 처리 방식
    #[arg(short = 'r', long, value_enum)]
    pub reservation_profile: Option<ReservationProfile>,

    /// PowerShell 실행 파일 경로
    #[arg(long)]
    pub powershell: Option<String>,

    /// 서버 응답 제한 시간 (초, 0이면 무제한)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// 스크립트만 출력하고 서버에는 적용하지 않음
    #[arg(long)]
    pub dry_run: bool,

    /// 종료 전 Enter 대기 안 함
    #[arg(long)]
    pub no_pause: bool,

    /// 기본 설정 파일(~/.dhcpgw/config.toml) 생성
    #[arg(long)]
    pub init_config: bool,

    /// 디버그 모드
    #[arg(short = 'd', long)]
    pub debug: bool,
}

impl Cli {
    /// 메뉴로 작업을 고르는지
    pub fn is_interactive(&self) -> bool {
        self.operation.is_none() && !self.init_config
    }

    /// 명령줄 인자로 설정 값 덮어쓰기
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(settings) = &self.settings {
            config.settings_path = settings.display().to_string();
        }
        if let Some(profile) = self.reservation_profile {
            config.reservation_profile = profile;
        }
        if let Some(powershell) = &self.powershell {
            config.powershell_path = powershell.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operation_and_overrides() {
        let cli = Cli::parse_from([
            "dhcpgw",
            "--operation",
            "scopes",
            "--settings",
            "site-a.json",
            "--reservation-profile",
            "provision",
            "--timeout",
            "0",
        ]);

        assert!(!cli.is_interactive());

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.settings_path, "site-a.json");
        assert_eq!(config.reservation_profile, ReservationProfile::Provision);
        assert_eq!(config.timeout_secs, 0);
        assert_eq!(config.powershell_path, "powershell.exe");
    }

    #[test]
    fn test_interactive_without_operation() {
        let cli = Cli::parse_from(["dhcpgw"]);
        assert!(cli.is_interactive());
    }
}
