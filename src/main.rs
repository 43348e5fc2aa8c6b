use std::io;
use std::io::prelude::*;

use anyhow::bail;
use decachess::chess::core::{Coordinate, PieceKind, Player, Square};
use decachess::chess::game::Game;
use decachess::chess::position::Position;
use itertools::Itertools;

/// Splits `e2e4`, `e2 e4` or `e9e10c` into squares and the promotion choice.
fn parse_move(input: &str) -> anyhow::Result<(Square, Square, Option<PieceKind>)> {
    let compact: String = input.split_whitespace().collect();
    let mut squares = Vec::with_capacity(2);
    let mut rest = compact.as_str();
    while squares.len() < 2 {
        let digits = rest
            .char_indices()
            .skip(1)
            .take_while(|(_, symbol)| symbol.is_ascii_digit())
            .count();
        let file = rest.chars().next().map_or(0, char::len_utf8);
        let (square, tail) = rest.split_at(file + digits);
        let coordinate = Coordinate::parse(square);
        match coordinate.square() {
            Some(square) => squares.push(square),
            None => bail!("expected a move like e2e4, got '{input}'"),
        }
        rest = tail;
    }
    let promotion = match rest.chars().collect_tuple() {
        None if rest.is_empty() => None,
        Some((symbol,)) => Some(PieceKind::try_from(symbol)?),
        _ => bail!("unexpected '{rest}' after the move"),
    };
    Ok((squares[0], squares[1], promotion))
}

fn play(game: &mut Game, input: &str) -> anyhow::Result<String> {
    let (from, to, promotion) = parse_move(input)?;
    match promotion {
        Some(kind) => game.play_promoting(from, to, kind),
        None => game.play(from, to),
    }
}

fn main() {
    decachess::print_engine_info();
    let mut game = Game::new();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let line = line.trim();
        if let Some(placement) = line.strip_prefix("position ") {
            match Position::try_from(placement)
                .and_then(|position| Game::from_position(position, Player::White))
            {
                Ok(new_game) => game = new_game,
                Err(e) => println!("Error reading the position: {e:#}"),
            }
        } else if let Some(input) = line.strip_prefix("move ") {
            match play(&mut game, input) {
                Ok(text) => {
                    println!("{text}");
                    if let Some(result) = game.result() {
                        println!("{result}");
                    }
                },
                Err(e) => println!("Error playing the move: {e:#}"),
            }
        } else if let Some(square) = line.strip_prefix("moves ") {
            match Square::try_from(square.trim()) {
                Ok(square) => match game.position().at(square) {
                    Some(piece) => println!("{}", piece.potential_moves().iter().join(" ")),
                    None => println!("Error listing moves: there is no piece on {square}"),
                },
                Err(e) => println!("Error listing moves: {e:#}"),
            }
        } else if line == "d" {
            println!("{:?}", game.position());
            println!("Side to move: {}", game.side_to_move());
        } else if line == "history" {
            println!("{}", game.transcript());
        } else if line == "quit" {
            break;
        } else if !line.is_empty() {
            println!("Error: unknown command '{line}'");
        }
    }
}
