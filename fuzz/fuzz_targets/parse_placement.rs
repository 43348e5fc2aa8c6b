#![no_main]
use decachess::chess::position::Position;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(position) = Position::try_from(input) {
        // Printing the position back yields placement text that parses to the
        // same board.
        let printed = position.to_string();
        let reparsed = Position::try_from(printed.as_str())
            .expect("printed placement should be accepted");
        assert_eq!(reparsed.to_string(), printed);
    }
});
