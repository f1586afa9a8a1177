use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{
    prelude::*,
    style::{Style, Stylize},
    widgets::*,
};
use simplelog::{Config, LevelFilter, WriteLogger};
use snekrs::{Direction, Game, GameStatus, StepResult};
use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

const BASE_TICK: Duration = Duration::from_millis(150);
const SPEED_STEP: f32 = 0.25;
const MIN_SPEED: f32 = 0.25;
const MAX_SPEED: f32 = 4.0;
// Each cell is drawn two columns wide so the grid looks square.
const CELL_WIDTH: u16 = 2;

fn main() -> Result<(), io::Error> {
    // Set up logging before anything else
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create("snekrs.log")?,
    )
    .map_err(io::Error::other)?;

    info!("Starting Snekrs");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), io::Error> {
    let mut last_tick = Instant::now();

    // One direction change per tick, so two quick keys cannot fold the
    // snake back onto itself before it has moved.
    let mut ignore_input = false;
    loop {
        terminal.draw(|f| app.render(f))?;

        let tick_rate = app.tick_rate();
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if app.handle_input(key, ignore_input) {
                    ignore_input = true;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.update();
            last_tick = Instant::now();
            ignore_input = false;
        }

        if let Screen::Exit = app.screen {
            return Ok(());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Screen {
    ReadyToStart,
    Playing,
    Paused,
    Finished,
    Exit,
}

struct App {
    screen: Screen,
    game: Game,
}

impl App {
    fn new() -> Self {
        App {
            screen: Screen::ReadyToStart,
            game: Game::default(),
        }
    }

    fn tick_rate(&self) -> Duration {
        self.game.tick_interval(BASE_TICK)
    }

    fn adjust_speed(&mut self, delta: f32) {
        let speed = (self.game.speed() + delta).clamp(MIN_SPEED, MAX_SPEED);
        if let Err(e) = self.game.set_speed(speed) {
            warn!("Could not change speed: {}", e);
        }
    }

    /// Returns true when the key turned the snake.
    fn handle_input(&mut self, key: event::KeyEvent, ignore_turns: bool) -> bool {
        use event::KeyCode;

        match self.screen {
            Screen::ReadyToStart => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.screen = Screen::Exit,
                KeyCode::Char(' ') => {
                    self.game.reset();
                    self.screen = Screen::Playing;
                }
                _ => {}
            },
            Screen::Playing => {
                let direction = match key.code {
                    KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
                    KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
                    KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
                    KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
                    KeyCode::Char('q') => {
                        self.screen = Screen::Finished;
                        None
                    }
                    KeyCode::Esc => {
                        self.screen = Screen::Exit;
                        None
                    }
                    KeyCode::Char(' ') => {
                        self.screen = Screen::Paused;
                        None
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        self.adjust_speed(SPEED_STEP);
                        None
                    }
                    KeyCode::Char('-') => {
                        self.adjust_speed(-SPEED_STEP);
                        None
                    }
                    _ => None,
                };
                if let Some(direction) = direction {
                    return !ignore_turns && self.game.change_direction(direction);
                }
            }
            Screen::Paused => match key.code {
                KeyCode::Char('q') => self.screen = Screen::Finished,
                KeyCode::Esc => self.screen = Screen::Exit,
                KeyCode::Char(' ') => self.screen = Screen::Playing,
                _ => {}
            },
            Screen::Finished => match key.code {
                KeyCode::Esc => self.screen = Screen::Exit,
                KeyCode::Char(' ') | KeyCode::Char('q') => self.screen = Screen::ReadyToStart,
                _ => {}
            },
            Screen::Exit => {}
        }
        false
    }

    fn update(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        match self.game.move_snake() {
            StepResult::Collision(collision) => {
                info!("{:?} collision, final score {}", collision, self.game.score());
                self.screen = Screen::Finished;
            }
            StepResult::Won => {
                info!("Grid filled, final score {}", self.game.score());
                self.screen = Screen::Finished;
            }
            StepResult::Nommed(_) | StepResult::Moved | StepResult::Inactive => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let score_text = match self.screen {
            Screen::Playing | Screen::Paused | Screen::Finished => format!(
                "SNEK    Score: {}    Speed: {:.2}x",
                self.game.score(),
                self.game.speed()
            ),
            _ => "SNEK".to_string(),
        };

        let size = frame.area();
        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + score
                Constraint::Min(0),    // Game area
            ])
            .split(size);

        frame.render_widget(
            Paragraph::new(score_text)
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        let grid = self.game.size();
        let arena = centered(
            layout[1],
            grid.width * CELL_WIDTH + 2,
            grid.height + 2,
        );

        match self.screen {
            Screen::ReadyToStart => {
                frame.render_widget(
                    Paragraph::new("Press SPACE to start")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    arena,
                );
            }
            Screen::Playing | Screen::Paused => {
                let title = if self.screen == Screen::Paused {
                    "Paused. Press SPACE to continue"
                } else {
                    "Playing"
                };
                let block = Block::default().title(title).borders(Borders::ALL);
                let inner_area = block.inner(arena);

                frame.render_widget(block, arena);
                frame.render_widget(GridView(&self.game), inner_area);
            }
            Screen::Finished => {
                let block = Block::default().borders(Borders::ALL);
                let inner_area = block.inner(arena);
                let headline = match self.game.status() {
                    GameStatus::Won => "YOU WIN",
                    _ => "GAME OVER",
                };

                frame.render_widget(block, arena);
                frame.render_widget(GridView(&self.game), inner_area);
                frame.render_widget(
                    Paragraph::new(format!(
                        "{}\nFinal Score: {}\nPress SPACE to play again",
                        headline,
                        self.game.score()
                    ))
                    .style(Style::default().bold())
                    .alignment(Alignment::Center),
                    inner_area,
                );
            }
            Screen::Exit => {}
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

struct GridView<'a>(&'a Game);

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = self.0;
        let mut paint = |x: i32, y: i32, symbol: &str, style: Style| {
            let col = area.x + x as u16 * CELL_WIDTH;
            let row = area.y + y as u16;
            if col + CELL_WIDTH <= area.right() && row < area.bottom() {
                buf.set_string(col, row, symbol, style);
            }
        };

        let mut segments = game.snake_positions();
        if let Some(head) = segments.next() {
            paint(head.x, head.y, "😀", Style::default().fg(Color::Yellow));
        }
        for pos in segments {
            paint(pos.x, pos.y, "  ", Style::default().bg(Color::Green));
        }

        if let Some(food) = game.food_position() {
            paint(food.x, food.y, "♥ ", Style::default().fg(Color::LightRed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_start_pause_and_exit() {
        let mut app = App::new();
        assert_eq!(app.screen, Screen::ReadyToStart);

        app.handle_input(key(KeyCode::Char(' ')), false);
        assert_eq!(app.screen, Screen::Playing);

        app.handle_input(key(KeyCode::Char(' ')), false);
        assert_eq!(app.screen, Screen::Paused);

        // ticks do nothing while paused
        let before = app.game.snapshot();
        app.update();
        assert_eq!(app.game.snapshot(), before);

        app.handle_input(key(KeyCode::Esc), false);
        assert_eq!(app.screen, Screen::Exit);
    }

    #[test]
    fn test_one_turn_per_tick() {
        let mut app = App::new();
        app.handle_input(key(KeyCode::Char(' ')), false);

        assert!(app.handle_input(key(KeyCode::Up), false));
        assert!(!app.handle_input(key(KeyCode::Left), true));
        assert_eq!(app.game.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_speed_keys_clamp() {
        let mut app = App::new();
        app.handle_input(key(KeyCode::Char(' ')), false);

        app.handle_input(key(KeyCode::Char('+')), false);
        assert_eq!(app.game.speed(), 1.25);
        assert!(app.tick_rate() < BASE_TICK);

        for _ in 0..20 {
            app.handle_input(key(KeyCode::Char('-')), false);
        }
        assert_eq!(app.game.speed(), MIN_SPEED);
    }

    #[test]
    fn test_wall_finishes_game() {
        let mut app = App::new();
        app.handle_input(key(KeyCode::Char(' ')), false);
        app.game
            .set_food_position(snekrs::Pos::new(0, 0))
            .expect("free cell");

        for _ in 0..snekrs::GRID_WIDTH {
            app.update();
        }
        assert_eq!(app.screen, Screen::Finished);
        assert!(app.game.is_game_over());
    }

    #[test]
    fn test_centered() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered(area, 42, 22), Rect::new(29, 9, 42, 22));
        assert_eq!(centered(Rect::new(0, 0, 10, 5), 42, 22), Rect::new(0, 0, 10, 5));
    }
}
