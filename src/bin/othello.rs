//! Console Othello: `cargo run --bin othello`.
//!
//! Moves are entered as `row,col`. Malformed or illegal input re-prompts; a
//! player with no legal move passes automatically. `q` quits.

use std::io::{self, BufRead, Write};

use starswarm::othello::{Board, Disc, parse_move};

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut board = Board::new();
    let mut current = Disc::Black;

    while !board.is_over() {
        println!("{board}");
        let moves = board.legal_moves(current);

        if moves.is_empty() {
            println!("{current} has no legal move and passes.");
            current = current.opponent();
            continue;
        }

        println!("{current} to move. Legal moves: {moves:?}");
        print!("row,col (q to quit)> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nInput closed, stopping the game.");
            return Ok(());
        };
        let line = line?;
        let input = line.trim();

        if matches!(input, "q" | "quit" | "exit") {
            println!("Game aborted.");
            return Ok(());
        }

        let Some((row, col)) = parse_move(input) else {
            println!("Enter a move as row,col - for example 2,3. Try again.");
            continue;
        };

        match board.apply(current, row, col) {
            Ok(flipped) => {
                println!("{current} plays ({row}, {col}), flipping {flipped}.");
                current = current.opponent();
            }
            Err(_) => {
                println!("That move is not legal. Try again.");
            }
        }
    }

    println!("{board}");
    let (black, white) = board.counts();
    println!("Game over! Black {black} - White {white}");
    match board.winner() {
        Some(winner) => println!("{winner} wins!"),
        None => println!("It's a draw."),
    }
    Ok(())
}
