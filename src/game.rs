//! Core game state and logic
//!
//! The engine owns all simulation state and mutates it only inside discrete
//! command calls or inside `tick`, which the hosting loop drives once per
//! frame with a monotonic millisecond timestamp. Everything the outside world
//! needs to react to is emitted as [`GameEvent`]s.

use crate::board::Board;
use crate::event::GameEvent;
use crate::lock::LockDelay;
use crate::mode::{GameMode, ModeClock};
use crate::piece::Piece;
use crate::queue::PieceQueue;
use crate::score::{Score, drop_interval_ms};
use crate::tetromino::{RotationDirection, TetrominoType};

const HARD_DROP_SHAKE: f32 = 5.0;
const TETRIS_SHAKE: f32 = 10.0;
const SHAKE_DECAY: f32 = 0.9;

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    /// Terminal: spawn collision or forfeit
    GameOver,
    /// Terminal: mode objective reached (sprint target, ultra timeout)
    Complete,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(self, GameState::GameOver | GameState::Complete)
    }
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    Hold,
    Pause,
    Quit,
}

/// Read-only view of the playfield for rendering
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub piece: Option<&'a Piece>,
    /// Lowest valid y for the active piece at its current x
    pub ghost_y: Option<i32>,
}

/// The game engine
pub struct Game {
    pub board: Board,
    /// Current falling piece
    pub current: Option<Piece>,
    /// Held piece (one swap per spawn cycle)
    pub hold: Option<TetrominoType>,
    can_hold: bool,
    queue: PieceQueue,
    pub score: Score,
    pub state: GameState,
    pub clock: ModeClock,
    lock: LockDelay,
    /// Timestamp of the previous tick
    last_tick: Option<u64>,
    /// Timestamp of the last gravity drop
    last_drop: u64,
    /// Whether the last successful action on the piece was a rotation
    /// (T-Spin eligibility; translations clear it)
    rotated_last: bool,
    /// Screen-shake amplitude, decayed every tick
    shake: f32,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a new game with the specified mode
    pub fn new(mode: GameMode) -> Self {
        Self::with_seed(mode, rand::random())
    }

    /// Create a new game with a fixed piece seed, for reproducible runs
    pub fn with_seed(mode: GameMode, seed: u64) -> Self {
        let mut queue = PieceQueue::with_seed(seed);
        let first = Piece::spawn(queue.next());
        Self {
            board: Board::new(),
            current: Some(first),
            hold: None,
            can_hold: true,
            queue,
            score: Score::new(),
            state: GameState::Playing,
            clock: ModeClock::new(mode),
            lock: LockDelay::new(),
            last_tick: None,
            last_drop: 0,
            rotated_last: false,
            shake: 0.0,
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.clock.mode
    }

    /// Upcoming pieces, for the preview panel
    pub fn preview(&self) -> impl Iterator<Item = TetrominoType> + '_ {
        self.queue.preview()
    }

    /// Current screen-shake amplitude (presentational)
    pub fn shake(&self) -> f32 {
        self.shake
    }

    /// Take all events emitted since the last drain, in transition order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            piece: self.current.as_ref(),
            ghost_y: self.current.as_ref().map(|p| p.ghost_y(&self.board)),
        }
    }

    /// Dispatch an input action
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.move_left();
            }
            Action::MoveRight => {
                self.move_right();
            }
            Action::SoftDrop => {
                self.soft_drop();
            }
            Action::HardDrop => {
                self.hard_drop();
            }
            Action::RotateCW => {
                self.rotate(RotationDirection::Clockwise);
            }
            Action::RotateCCW => {
                self.rotate(RotationDirection::CounterClockwise);
            }
            Action::Hold => self.hold_piece(),
            Action::Pause => self.toggle_pause(),
            Action::Quit => self.forfeit(),
        }
    }

    /// Try to move the piece one cell left
    pub fn move_left(&mut self) -> bool {
        self.translate(-1)
    }

    /// Try to move the piece one cell right
    pub fn move_right(&mut self) -> bool {
        self.translate(1)
    }

    fn translate(&mut self, dx: i32) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        let moved = if dx < 0 {
            piece.move_left(&self.board)
        } else {
            piece.move_right(&self.board)
        };
        // A translation attempt ends T-Spin eligibility either way
        self.rotated_last = false;
        if moved {
            self.lock.qualifying_move();
            self.events.push(GameEvent::Move);
        }
        moved
    }

    /// Move the piece down one cell. Returns whether a cell was gained.
    pub fn soft_drop(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if piece.move_down(&self.board) {
            self.score.add_soft_drop(1);
            self.rotated_last = false;
            self.lock.qualifying_move();
            self.events.push(GameEvent::Move);
            true
        } else {
            false
        }
    }

    /// Drop the piece to the floor and lock it immediately, bypassing the
    /// lock-delay timer. Returns the number of cells dropped.
    pub fn hard_drop(&mut self) -> u32 {
        if self.state != GameState::Playing {
            return 0;
        }
        let Some(piece) = self.current.as_mut() else {
            return 0;
        };
        let cells = piece.hard_drop(&self.board);
        self.score.add_hard_drop(cells);
        self.shake = HARD_DROP_SHAKE;
        self.lock_current();
        cells
    }

    /// Try to rotate the piece, walking the wall-kick candidates
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        match piece.rotate(direction, &self.board) {
            Some(kicked) => {
                self.rotated_last = true;
                self.lock.qualifying_move();
                self.events.push(GameEvent::RotateSuccess { kicked });
                true
            }
            None => {
                self.events.push(GameEvent::RotateFail);
                false
            }
        }
    }

    /// Swap the active piece with the hold slot (once per spawn cycle)
    pub fn hold_piece(&mut self) {
        if self.state != GameState::Playing || !self.can_hold {
            return;
        }
        let Some(current) = self.current.take() else {
            return;
        };
        let next = match self.hold.take() {
            Some(held) => Piece::spawn(held),
            None => Piece::spawn(self.queue.next()),
        };
        self.hold = Some(current.piece_type);
        self.can_hold = false;
        self.lock.reset();
        self.rotated_last = false;
        self.events.push(GameEvent::Hold);

        let blocked = !self.board.can_place(next.shape(), next.x, next.y);
        self.current = Some(next);
        if blocked {
            self.end(GameState::GameOver);
        }
    }

    /// Flip the pause flag. Simulation is skipped while paused, but the loop
    /// stays scheduled.
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::PauseToggled { paused: true });
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                self.events.push(GameEvent::PauseToggled { paused: false });
            }
            _ => {}
        }
    }

    /// Give up the current game
    pub fn forfeit(&mut self) {
        if !self.state.is_over() {
            self.end(GameState::GameOver);
        }
    }

    /// Advance the simulation by one frame.
    ///
    /// `now_ms` is a monotonic timestamp supplied by the hosting loop; all
    /// engine timing (gravity, lock delay, mode clocks) derives from it.
    pub fn tick(&mut self, now_ms: u64) {
        match self.state {
            GameState::Paused => {
                // Freeze the timers so resuming doesn't replay the gap
                self.last_tick = Some(now_ms);
                self.last_drop = now_ms;
                return;
            }
            GameState::Playing => {}
            _ => return,
        }

        let delta = self
            .last_tick
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_tick = Some(now_ms);

        // Lock delay: a grounded piece commits once the grace period elapses
        let grounded = self
            .current
            .as_ref()
            .is_some_and(|p| p.is_grounded(&self.board));
        if grounded {
            self.lock.ground();
            if self.lock.advance(delta) {
                self.lock_current();
                return;
            }
        } else {
            self.lock.release();
        }

        // Gravity: failing to drop is a grounding event, not an error
        if now_ms.saturating_sub(self.last_drop) > drop_interval_ms(self.score.level) {
            if let Some(piece) = self.current.as_mut() {
                if !piece.move_down(&self.board) {
                    self.lock.ground();
                }
            }
            self.last_drop = now_ms;
        }

        // Mode clock only accrues game time while unpaused
        self.clock.advance(delta);
        if self.clock.time_expired() {
            self.end(GameState::Complete);
            return;
        }

        // Transient presentation effects
        self.shake = if self.shake > 0.5 {
            self.shake * SHAKE_DECAY
        } else {
            0.0
        };
    }

    /// Commit the active piece, run the line-clear engine, spawn the next
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        self.board
            .commit(piece.shape(), piece.x, piece.y, piece.piece_type.color());
        self.events.push(GameEvent::Lock);

        let t_spin = self.detect_t_spin(&piece);
        self.apply_clears(t_spin);

        if self.state != GameState::Playing {
            return;
        }
        self.spawn_next();
    }

    /// Simplified 3-corner T-Spin rule: the piece is a T, the last successful
    /// action was a rotation, and at least 3 of the 4 bounding-box corners are
    /// blocked (out of bounds counts as blocked).
    fn detect_t_spin(&self, piece: &Piece) -> bool {
        if piece.piece_type != TetrominoType::T || !self.rotated_last {
            return false;
        }
        const CORNERS: [(i32, i32); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];
        let blocked = CORNERS
            .iter()
            .filter(|&&(dx, dy)| !self.board.is_free(piece.x + dx, piece.y + dy))
            .count();
        blocked >= 3
    }

    fn apply_clears(&mut self, t_spin: bool) {
        let rows = self.board.full_rows();
        if rows.is_empty() {
            self.score.reset_combo();
            return;
        }

        self.board.clear_rows(&rows);
        let count = rows.len() as u8;
        let all_clear = self.board.is_empty();
        let outcome = self.score.add_clear(count, t_spin, all_clear);

        self.events.push(GameEvent::LineClear { count, t_spin });
        if outcome.combo_fired {
            self.events.push(GameEvent::Combo {
                count: outcome.combo,
            });
        }
        if all_clear {
            self.events.push(GameEvent::PerfectClear);
        }
        if let Some(level) = outcome.leveled_up {
            self.events.push(GameEvent::LevelUp { level });
        }
        if count == 4 {
            self.shake = TETRIS_SHAKE;
        }

        if self.clock.target_reached(self.score.lines) {
            self.end(GameState::Complete);
        }
    }

    fn spawn_next(&mut self) {
        let piece = Piece::spawn(self.queue.next());
        self.can_hold = true;
        self.lock.reset();
        self.rotated_last = false;

        let blocked = !self.board.can_place(piece.shape(), piece.x, piece.y);
        self.current = Some(piece);
        if blocked {
            self.end(GameState::GameOver);
        }
    }

    /// Enter a terminal state and emit the game-over event exactly once
    fn end(&mut self, state: GameState) {
        if self.state.is_over() {
            return;
        }
        self.state = state;
        self.events.push(GameEvent::GameOver {
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            mode: self.clock.mode,
        });
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameMode::Marathon)
    }
}
