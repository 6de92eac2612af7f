//! Interactive terminal play using crossterm.
//!
//! Presentation only: key presses are translated to blank-relative slots
//! and fed to the session; every rule lives in the library.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::style::Print;
use crossterm::{cursor, execute, queue, terminal};

use slider::session::{Session, Status, DIFFICULTY_SIZES};

/// Runs the interactive game loop until the player quits.
pub fn play(mut session: Session) -> io::Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = event_loop(&mut session, &mut stdout);

    // restore the terminal even if the loop failed
    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn event_loop(session: &mut Session, stdout: &mut Stdout) -> io::Result<()> {
    loop {
        draw(session, stdout)?;

        // wake up periodically so the clock keeps ticking while idle
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char('r') => session.reset(),
            KeyCode::Char('n') => session.new_game(next_size(session.game().size())),
            // arrows steer the blank; the targeted tile slides the other way
            KeyCode::Up | KeyCode::Char('w') => slide(session, -1, 0),
            KeyCode::Down | KeyCode::Char('s') => slide(session, 1, 0),
            KeyCode::Left | KeyCode::Char('a') => slide(session, 0, -1),
            KeyCode::Right | KeyCode::Char('d') => slide(session, 0, 1),
            _ => {}
        }
    }
    Ok(())
}

/// The next difficulty preset after `size`, wrapping around.
fn next_size(size: usize) -> usize {
    match DIFFICULTY_SIZES.iter().position(|&preset| preset == size) {
        Some(index) => DIFFICULTY_SIZES[(index + 1) % DIFFICULTY_SIZES.len()],
        None => DIFFICULTY_SIZES[0],
    }
}

/// Moves the blank one slot in the given direction, if the grid allows it.
fn slide(session: &mut Session, delta_row: isize, delta_col: isize) {
    let size = session.game().size() as isize;
    let blank = session.game().blank_position() as isize;
    let row = blank / size + delta_row;
    let col = blank % size + delta_col;

    if (0..size).contains(&row) && (0..size).contains(&col) {
        session.click((row * size + col) as usize);
    }
}

fn draw(session: &Session, stdout: &mut Stdout) -> io::Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All)
    )?;

    let game = session.game();
    let header = format!(
        "slider {0}x{0}   moves {1}   time {2}",
        game.size(),
        session.moves(),
        format_elapsed(session.elapsed())
    );
    queue!(stdout, Print(header), cursor::MoveToNextLine(2))?;

    for line in game.to_string().lines() {
        queue!(stdout, Print(line), cursor::MoveToNextLine(1))?;
    }
    queue!(stdout, cursor::MoveToNextLine(1))?;

    let footer = match session.status() {
        Status::Complete => format!(
            "Solved in {} moves! [r] play again, [n] change size, [q] quit",
            session.moves()
        ),
        _ => "[arrows/wasd] slide, [r] reshuffle, [n] change size, [q] quit".to_string(),
    };
    queue!(stdout, Print(footer), cursor::MoveToNextLine(1))?;

    stdout.flush()
}

/// Formats a duration as m:ss.
fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0:00");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "0:59");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "1:01");
        assert_eq!(format_elapsed(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn test_next_size_cycles_presets() {
        assert_eq!(next_size(3), 4);
        assert_eq!(next_size(4), 5);
        assert_eq!(next_size(5), 3);
        assert_eq!(next_size(7), 3); // off-preset sizes return to the start
    }
}
