#![no_main]
use decachess::chess::core::Player;
use decachess::chess::position::Position;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut position) = Position::try_from(input) else {
        return;
    };
    for player in [Player::White, Player::Black] {
        let check = position.is_check(player);
        let mate = position.is_checkmate(player);
        let stalemate = position.is_stalemate(!player);
        if let (Ok(check), Ok(mate), Ok(stalemate)) = (check, mate, stalemate) {
            assert!(!mate || check);
            assert!(!(mate && stalemate));
        }
    }
    let _ = position.is_draw();
    // Play the first legal move of every piece in turn.
    let moves: Vec<_> = position
        .board()
        .pieces()
        .filter_map(|piece| piece.potential_moves().iter().next().map(|to| (piece.square(), to)))
        .collect();
    for (from, to) in moves {
        let _ = position.make_move(from, to);
    }
});
