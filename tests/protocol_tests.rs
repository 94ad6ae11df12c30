use battleship_sync::{decode, encode, Command, DecodeError, Reply};

#[test]
fn test_roundtrip() {
    for cmd in [
        Command::Shoot { col: 3, row: 5 },
        Command::Answer(Reply::Hit),
        Command::Save("abc123".to_string()),
        Command::Load("abc123".to_string()),
        Command::Size(10),
        Command::Confirm,
        Command::Pass,
        Command::Close,
    ] {
        assert_eq!(decode(&encode(&cmd)).unwrap(), cmd);
    }
}

#[test]
fn test_wire_text() {
    assert_eq!(encode(&Command::Shoot { col: 3, row: 5 }), "shot 3 5");
    assert_eq!(encode(&Command::Answer(Reply::Miss)), "answer 0");
    assert_eq!(encode(&Command::Confirm), "confirmed");
    assert_eq!(Command::Size(12).to_string(), "size 12");
    assert_eq!(encode(&Command::Close), "");
}

#[test]
fn test_case_and_padding_ignored() {
    assert_eq!(decode("  SHOT 2 4\r").unwrap(), Command::Shoot { col: 2, row: 4 });
    assert_eq!(decode("Confirmed").unwrap(), Command::Confirm);
    assert_eq!("PASS".parse::<Command>().unwrap(), Command::Pass);
}

#[test]
fn test_contains_match_with_prefix() {
    assert_eq!(decode("peer: answer 2").unwrap(), Command::Answer(Reply::Sunk));
    assert_eq!(decode("xx size 8").unwrap(), Command::Size(8));
}

#[test]
fn test_literal_precedence() {
    // "shot " is tested before "save "
    assert_eq!(decode("save shot 1 2").unwrap(), Command::Shoot { col: 1, row: 2 });
    // "confirmed" wins over "pass"
    assert_eq!(decode("pass confirmed").unwrap(), Command::Confirm);
    // save ids run to the end of the line
    assert_eq!(decode("save pass").unwrap(), Command::Save("pass".to_string()));
}

#[test]
fn test_empty_line_is_close() {
    assert_eq!(decode("").unwrap(), Command::Close);
    assert_eq!(decode("   ").unwrap(), Command::Close);
}

#[test]
fn test_ids_are_lowercased() {
    assert_eq!(decode("load MySave").unwrap(), Command::Load("mysave".to_string()));
}

#[test]
fn test_malformed_lines() {
    assert!(matches!(decode("hello"), Err(DecodeError::Unrecognized(_))));
    assert_eq!(
        decode("shot 3").unwrap_err(),
        DecodeError::MissingField { command: "shot", field: "row" }
    );
    assert_eq!(
        decode("shot a b").unwrap_err(),
        DecodeError::InvalidNumber { command: "shot", value: "a".to_string() }
    );
    assert!(matches!(decode("shot 1 2 3"), Err(DecodeError::TrailingInput { .. })));
    assert_eq!(decode("answer 7").unwrap_err(), DecodeError::InvalidAnswer(7));
    assert_eq!(
        decode("answer 999").unwrap_err(),
        DecodeError::InvalidNumber { command: "answer", value: "999".to_string() }
    );
    assert_eq!(
        decode("save ").unwrap_err(),
        DecodeError::Unrecognized("save".to_string())
    );
    assert!(matches!(decode("confirmed now"), Err(DecodeError::TrailingInput { .. })));
}

#[test]
fn test_reply_codes() {
    assert_eq!(Reply::from_code(2), Some(Reply::Sunk));
    assert_eq!(Reply::from_code(3), None);
    assert_eq!(Reply::Hit.code(), 1);
}
