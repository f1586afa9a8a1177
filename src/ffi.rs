//! C API over a heap-allocated [`Game`].
//!
//! A handle is a `Box<Game>` turned into a raw pointer by `create_game` and
//! released by `destroy_game`. Null handles are tolerated everywhere and give
//! neutral answers; a handle that was already destroyed must not be reused.

use std::ffi::{c_float, c_int, c_void};
use std::panic;
use std::ptr;

use log::{warn, LevelFilter};
use simplelog::{Config, SimpleLogger};

use crate::game::Game;
use crate::geometry::{Direction, Pos};

/// Written by `get_food_position` when the snake fills the grid.
pub const NO_FOOD: Pos = Pos::new(-1, -1);

unsafe fn game_ref<'a>(game: *const c_void) -> Option<&'a Game> {
    (game as *const Game).as_ref()
}

unsafe fn game_mut<'a>(game: *mut c_void) -> Option<&'a mut Game> {
    (game as *mut Game).as_mut()
}

fn to_c_int(value: impl TryInto<c_int>) -> c_int {
    value.try_into().unwrap_or(c_int::MAX)
}

/// Returns null if building the game panics. Running out of memory aborts
/// the process instead, as every Rust allocation failure does.
#[no_mangle]
pub extern "C" fn create_game() -> *mut c_void {
    match panic::catch_unwind(|| Box::new(Game::default())) {
        Ok(game) => Box::into_raw(game) as *mut c_void,
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `game` must be null or a handle from `create_game` not yet destroyed.
#[no_mangle]
pub unsafe extern "C" fn destroy_game(game: *mut c_void) {
    if !game.is_null() {
        drop(Box::from_raw(game as *mut Game));
    }
}

/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn reset_game(game: *mut c_void) {
    if let Some(game) = game_mut(game) {
        game.reset();
    }
}

/// Advances one tick. Returns true when the snake ate this tick.
///
/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn move_snake(game: *mut c_void) -> bool {
    match game_mut(game) {
        Some(game) => game.move_snake().ate_food(),
        None => false,
    }
}

/// `direction` is 0 = up, 1 = right, 2 = down, 3 = left.
///
/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn change_direction(game: *mut c_void, direction: c_int) {
    let Some(game) = game_mut(game) else {
        return;
    };
    match Direction::try_from(direction) {
        Ok(direction) => {
            game.change_direction(direction);
        }
        Err(value) => warn!("Ignoring unknown direction {}", value),
    }
}

/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn is_game_over(game: *const c_void) -> bool {
    game_ref(game).map_or(true, Game::is_game_over)
}

/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn get_score(game: *const c_void) -> c_int {
    game_ref(game).map_or(0, |game| to_c_int(game.score()))
}

/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn get_snake_length(game: *const c_void) -> c_int {
    game_ref(game).map_or(0, |game| to_c_int(game.snake_len()))
}

/// Copies the body, head first, into `positions`.
///
/// # Safety
/// `game` must be null or a live handle, and `positions` must be null or
/// have room for `get_snake_length` entries.
#[no_mangle]
pub unsafe extern "C" fn get_snake_positions(game: *const c_void, positions: *mut Pos) {
    let Some(game) = game_ref(game) else {
        return;
    };
    if positions.is_null() {
        return;
    }
    for (i, &segment) in game.snake_positions().enumerate() {
        *positions.add(i) = segment;
    }
}

/// Writes `(-1, -1)` when there is no food on the grid.
///
/// # Safety
/// `game` must be null or a live handle, `position` null or writable.
#[no_mangle]
pub unsafe extern "C" fn get_food_position(game: *const c_void, position: *mut Pos) {
    let (Some(game), Some(out)) = (game_ref(game), position.as_mut()) else {
        return;
    };
    *out = game.food_position().unwrap_or(NO_FOOD);
}

/// Returns false and leaves the food alone when the cell is off the grid or
/// under the snake.
///
/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn set_food_position(game: *mut c_void, x: c_int, y: c_int) -> bool {
    let Some(game) = game_mut(game) else {
        return false;
    };
    match game.set_food_position(Pos::new(x, y)) {
        Ok(()) => true,
        Err(e) => {
            warn!("set_food_position: {}", e);
            false
        }
    }
}

/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn get_snake_direction(game: *const c_void) -> c_int {
    let direction = game_ref(game).map_or(Direction::Right, Game::pending_direction);
    direction as c_int
}

/// Fills every out-parameter in one call. `snake_positions` receives x, y
/// pairs and needs room for twice the snake length. Nothing is written unless
/// every pointer is non-null.
///
/// # Safety
/// `game` must be null or a live handle; the other pointers must be null or
/// writable for the sizes above.
#[no_mangle]
pub unsafe extern "C" fn get_game_state(
    game: *const c_void,
    snake_positions: *mut c_int,
    snake_length: *mut c_int,
    food_position: *mut c_int,
    score: *mut c_int,
    direction: *mut c_int,
    game_over: *mut bool,
) {
    let Some(game) = game_ref(game) else {
        return;
    };
    if snake_positions.is_null()
        || snake_length.is_null()
        || food_position.is_null()
        || score.is_null()
        || direction.is_null()
        || game_over.is_null()
    {
        return;
    }

    let snapshot = game.snapshot();
    for (i, segment) in snapshot.snake.iter().enumerate() {
        *snake_positions.add(i * 2) = segment.x;
        *snake_positions.add(i * 2 + 1) = segment.y;
    }
    let food = snapshot.food.unwrap_or(NO_FOOD);

    *snake_length = to_c_int(snapshot.snake.len());
    *food_position = food.x;
    *food_position.add(1) = food.y;
    *score = to_c_int(snapshot.score);
    *direction = snapshot.direction as c_int;
    *game_over = game.is_game_over();
}

/// Ignores speeds that are not finite and positive.
///
/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn set_game_speed(game: *mut c_void, speed: c_float) {
    if let Some(game) = game_mut(game) {
        if let Err(e) = game.set_speed(speed) {
            warn!("set_game_speed: {}", e);
        }
    }
}

/// # Safety
/// `game` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn get_game_speed(game: *const c_void) -> c_float {
    game_ref(game).map_or(crate::config::DEFAULT_SPEED, Game::speed)
}

/// Sends library logs to the terminal for hosts that have no logger of their
/// own. Returns false if a logger was already installed.
#[no_mangle]
pub extern "C" fn enable_logging(verbose: bool) -> bool {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::init(level, Config::default()).is_ok()
}
