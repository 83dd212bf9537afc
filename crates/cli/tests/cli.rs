use assert_cmd::Command;

fn bookstore() -> Command {
    let mut cmd = Command::cargo_bin("bookstore").unwrap();
    // Point at an empty directory so only defaults apply.
    cmd.env("BOOKSTORE_CONFIG_DIR", env!("CARGO_TARGET_TMPDIR"))
        .env("BOOKSTORE_ENV", "local")
        .env_remove("BOOKSTORE_AUTH__JWT_SECRET");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = bookstore().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["serve", "settings", "issue-token"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn issue_token_prints_a_jwt() {
    let output = bookstore()
        .args([
            "issue-token",
            "--user",
            "0190a5b8-7c4e-7000-8000-000000000001",
            "--role",
            "admin",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let token = String::from_utf8(output.stdout).unwrap();
    assert_eq!(token.trim().split('.').count(), 3);
}

#[test]
fn issue_token_rejects_unknown_role() {
    bookstore()
        .args([
            "issue-token",
            "--user",
            "0190a5b8-7c4e-7000-8000-000000000001",
            "--role",
            "owner",
        ])
        .assert()
        .failure();
}

#[test]
fn settings_omit_secrets() {
    let output = bookstore()
        .env("BOOKSTORE_PAYMENT__SECRET_KEY", "sk_test_hidden")
        .arg("settings")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"api_prefix\": \"/api/v1\""));
    assert!(!stdout.contains("sk_test_hidden"));
}
