//! 명령을 PowerShell 스크립트 텍스트로 변환
//!
//! 설정 값이 스크립트에 들어가는 경로는 [`quote`] 하나뿐입니다.

use crate::executor::command::MutationCommand;

/// 실패한 명령을 표시하는 출력 줄 접두사
pub const ERROR_MARKER: &str = "##dhcpgw-error##";

/// 세션 준비 명령 (실행 정책 완화, DhcpServer 모듈 로드)
pub const SETUP_PRELUDE: &[&str] = &[
    "Set-ExecutionPolicy -ExecutionPolicy Unrestricted -Scope Process -Force",
    "Import-Module DhcpServer -ErrorAction Stop",
];

/// 작은따옴표 문자열 리터럴로 감싸기
///
/// 작은따옴표 안에서는 `$`, 백틱 등이 해석되지 않으므로 따옴표 문자만
/// 두 번 써서 이스케이프하면 됩니다. PowerShell은 유니코드 작은따옴표도
/// 구분자로 취급합니다.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// 명령 하나를 렌더링
///
/// `skip_existing` 이면 예약 추가는 같은 IP의 예약이 없을 때만 실행됩니다.
pub fn render_command(command: &MutationCommand, skip_existing: bool) -> String {
    match command {
        MutationCommand::SetScopeGateway { scope_id, gateway } => format!(
            "Set-DhcpServerv4OptionValue -ScopeId {} -OptionId 3 -Value {} -ErrorAction Stop",
            quote(scope_id),
            quote(gateway)
        ),
        MutationCommand::SetReservationGateway {
            ip_address,
            gateway,
        } => format!(
            "Set-DhcpServerv4OptionValue -ReservedIP {} -OptionId 3 -Value {} -ErrorAction Stop",
            quote(ip_address),
            quote(gateway)
        ),
        MutationCommand::AddReservation {
            scope_id,
            ip_address,
            client_id,
            name,
            description,
        } => {
            let mut add = format!(
                "Add-DhcpServerv4Reservation -ScopeId {} -IPAddress {} -ClientId {}",
                quote(scope_id),
                quote(ip_address),
                quote(client_id)
            );
            if let Some(name) = name {
                add.push_str(&format!(" -Name {}", quote(name)));
            }
            if let Some(description) = description {
                add.push_str(&format!(" -Description {}", quote(description)));
            }
            add.push_str(" -ErrorAction Stop");

            if skip_existing {
                format!(
                    "if (-not (Get-DhcpServerv4Reservation -IPAddress {} -ErrorAction SilentlyContinue)) {{ {} }}",
                    quote(ip_address),
                    add
                )
            } else {
                add
            }
        }
    }
}

/// 실패해도 다음 줄이 계속 실행되도록 명령을 감쌈
///
/// `index` 0은 준비 단계, 1부터는 배치 안 명령 순서입니다.
pub fn guard(index: usize, statement: &str) -> String {
    format!(
        "try {{ {} }} catch {{ Write-Output ('{}{{0}}##{{1}}' -f {}, ($_.Exception.Message -replace '\\r?\\n', ' ')) }}",
        statement, ERROR_MARKER, index
    )
}

/// 준비 단계와 명령 전체를 하나의 스크립트로
pub fn render_script(prelude: &[String], commands: &[MutationCommand], skip_existing: bool) -> String {
    let mut lines = vec!["$ProgressPreference = 'SilentlyContinue'".to_string()];

    for statement in prelude {
        lines.push(guard(0, statement));
    }

    for (idx, command) in commands.iter().enumerate() {
        lines.push(guard(idx + 1, &render_command(command, skip_existing)));
    }

    lines.join("\n")
}

/// 출력에서 실패 기록 추출 (순서 유지)
pub fn parse_error_lines(output: &str) -> Vec<(usize, String)> {
    output
        .lines()
        .filter_map(|line| line.trim_end().strip_prefix(ERROR_MARKER))
        .filter_map(|rest| {
            let (index, message) = rest.split_once("##")?;
            Some((index.trim().parse().ok()?, message.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(name: Option<&str>) -> MutationCommand {
        MutationCommand::AddReservation {
            scope_id: "10.0.0.0".to_string(),
            ip_address: "10.0.0.9".to_string(),
            client_id: "00-11-22-33-44-55".to_string(),
            name: name.map(str::to_string),
            description: None,
        }
    }

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote("10.0.0.1"), "'10.0.0.1'");
    }

    #[test]
    fn test_quote_neutralizes_single_quotes() {
        assert_eq!(quote("it's"), "'it''s'");
        assert_eq!(quote("'; Remove-Item *; '"), "'''; Remove-Item *; '''");
        assert_eq!(quote("a\u{2019}b"), "'a\u{2019}\u{2019}b'");
    }

    #[test]
    fn test_quote_leaves_other_characters() {
        assert_eq!(quote("$env:PATH `n"), "'$env:PATH `n'");
    }

    #[test]
    fn test_render_scope_gateway() {
        let command = MutationCommand::SetScopeGateway {
            scope_id: "10.0.0.0".to_string(),
            gateway: "10.0.0.1".to_string(),
        };

        assert_eq!(
            render_command(&command, true),
            "Set-DhcpServerv4OptionValue -ScopeId '10.0.0.0' -OptionId 3 -Value '10.0.0.1' -ErrorAction Stop"
        );
    }

    #[test]
    fn test_render_reservation_gateway() {
        let command = MutationCommand::SetReservationGateway {
            ip_address: "10.0.0.5".to_string(),
            gateway: "10.0.0.254".to_string(),
        };

        assert!(render_command(&command, true)
            .starts_with("Set-DhcpServerv4OptionValue -ReservedIP '10.0.0.5' -OptionId 3"));
    }

    #[test]
    fn test_render_add_reservation_if_absent() {
        let rendered = render_command(&add(Some("printer")), true);

        assert!(rendered.starts_with("if (-not (Get-DhcpServerv4Reservation -IPAddress '10.0.0.9'"));
        assert!(rendered.contains("-ClientId '00-11-22-33-44-55' -Name 'printer' -ErrorAction Stop"));
        assert!(!rendered.contains("-Description"));
    }

    #[test]
    fn test_render_add_reservation_plain() {
        let rendered = render_command(&add(None), false);

        assert!(rendered.starts_with("Add-DhcpServerv4Reservation -ScopeId '10.0.0.0'"));
        assert!(!rendered.contains("Get-DhcpServerv4Reservation"));
    }

    #[test]
    fn test_render_script_order() {
        let prelude: Vec<String> = SETUP_PRELUDE.iter().map(|s| s.to_string()).collect();
        let commands = vec![
            MutationCommand::SetScopeGateway {
                scope_id: "10.0.1.0".to_string(),
                gateway: "10.0.1.1".to_string(),
            },
            add(None),
        ];

        let script = render_script(&prelude, &commands, true);
        let lines: Vec<&str> = script.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("Set-ExecutionPolicy"));
        assert!(lines[2].contains("Import-Module DhcpServer"));
        assert!(lines[3].contains("-f 1,"));
        assert!(lines[4].contains("-f 2,"));
    }

    #[test]
    fn test_parse_error_lines() {
        let output = "\
some output
##dhcpgw-error##2##Scope not found
##dhcpgw-error##3##Failed to set option: access denied
##dhcpgw-error##bogus##ignored
";

        let errors = parse_error_lines(output);
        assert_eq!(
            errors,
            vec![
                (2, "Scope not found".to_string()),
                (3, "Failed to set option: access denied".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_error_message_with_separator() {
        let errors = parse_error_lines("##dhcpgw-error##1##a##b\r\n");
        assert_eq!(errors, vec![(1, "a##b".to_string())]);
    }
}
