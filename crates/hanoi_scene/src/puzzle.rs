//! Towers of Hanoi state machine
//!
//! Solves the puzzle forever: once every disk has reached the last peg, a
//! larger disk is slid in underneath, the whole stack glides back to the first
//! peg and the next, faster round begins.
//!
//! Puzzle space: pegs stand at x = 0, 1 and 2; y grows upward from the floor
//! at 0. Disk `m` (1-based, larger is wider) is `m / n * 0.5 + 0.25` wide.

use hanoi_animation::{Easing, EasingTable};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::draw::{Color, DrawContext, Rect};

/// Disks on a peg, bottom first
pub type Peg = SmallVec<[u32; 16]>;

/// Area erased before each frame, in puzzle space
pub const CLEAR_AREA: Rect = Rect::new(-1.0, -0.5, 4.0, 2.0);

/// Puzzle tuning
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleParams {
    /// Duration of a single move in the first round, in milliseconds
    pub move_duration: f64,
    /// Factor applied to the move duration after each round
    pub speedup: f64,
    /// Upper bound of the disk height
    pub max_disk_height: f64,
    /// Disk colors, cycled by disk number
    pub palette: Vec<Color>,
}

impl Default for PuzzleParams {
    fn default() -> Self {
        Self {
            move_duration: 1000.0,
            speedup: 0.75,
            max_disk_height: 0.2,
            palette: [
                0xFF0000, 0xFF8800, 0xFFFF00, 0x88FF00, 0x00FF00, 0x00FFFF, 0x0088FF, 0x0000FF,
                0x8800FF, 0xFF0088,
            ]
            .into_iter()
            .map(Color::from_hex)
            .collect(),
        }
    }
}

/// Where the solver is within its three-move cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Next move is between the first two pegs of the cycle
    First,
    Second,
    /// Next move is between pegs 1 and 2
    Third,
    /// A new disk is being added and the stack carried back
    Growing,
}

/// A disk in flight between two pegs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiskMove {
    pub disk: u32,
    pub from: usize,
    pub to: usize,
    pub started_at: f64,
    pub x: f64,
    pub dx: f64,
    pub y: f64,
    pub dy: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Disk(DiskMove),
    Growth { from: u32, started_at: f64 },
}

/// Things that happened during a frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PuzzleEvent {
    MoveStarted { disk: u32, from: usize, to: usize },
    MoveFinished { disk: u32, to: usize },
    /// A round finished; the puzzle now has `disks` disks
    Grew { disks: u32, move_duration: f64 },
}

/// The animated puzzle
#[derive(Clone, Debug)]
pub struct Puzzle {
    params: PuzzleParams,
    pegs: [Peg; 3],
    /// Disk count; fractional while growing
    n: f64,
    height: f64,
    phase: Phase,
    motion: Option<Motion>,
    move_duration: f64,
    moves: u64,
    events: Vec<PuzzleEvent>,
}

impl Puzzle {
    /// A one-disk puzzle on the first peg
    pub fn new(params: PuzzleParams) -> Self {
        let mut first = Peg::new();
        first.push(1);
        let height = params.max_disk_height.min(1.0);
        let move_duration = params.move_duration;
        Self {
            params,
            pegs: [first, Peg::new(), Peg::new()],
            n: 1.0,
            height,
            phase: Phase::First,
            motion: None,
            move_duration,
            moves: 0,
            events: Vec::new(),
        }
    }

    pub fn pegs(&self) -> &[Peg; 3] {
        &self.pegs
    }

    /// Current (possibly fractional) disk count
    pub fn disk_count(&self) -> f64 {
        self.n
    }

    pub fn disk_height(&self) -> f64 {
        self.height
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The disk in flight, if any
    pub fn current_move(&self) -> Option<&DiskMove> {
        match &self.motion {
            Some(Motion::Disk(m)) => Some(m),
            _ => None,
        }
    }

    /// Current duration of one move, in milliseconds
    pub fn move_duration(&self) -> f64 {
        self.move_duration
    }

    /// Completed disk moves so far
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Drain the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    fn disk_width(&self, disk: u32) -> f64 {
        disk as f64 / self.n * 0.5 + 0.25
    }

    fn draw_disk(&self, ctx: &mut dyn DrawContext, disk: u32, x: f64, y: f64, height: f64) {
        let width = self.disk_width(disk);
        let palette = &self.params.palette;
        let color = if palette.is_empty() {
            Color::WHITE
        } else {
            palette[(disk as usize - 1) % palette.len()]
        };
        ctx.fill_rect(Rect::new(x - width / 2.0, y, width, height), color);
    }

    /// Draw the frame at `now` and advance the puzzle
    pub fn frame(&mut self, now: f64, table: &EasingTable, ctx: &mut dyn DrawContext) {
        ctx.clear_rect(CLEAR_AREA);
        self.draw_stacks(now, table, ctx);

        match self.motion {
            Some(Motion::Growth { from, started_at }) => self.grow(now, from, started_at, table),
            Some(Motion::Disk(disk_move)) => self.fly(now, disk_move, table, ctx),
            None => self.next_move(now),
        }
    }

    fn draw_stacks(&self, now: f64, table: &EasingTable, ctx: &mut dyn DrawContext) {
        let growing = match self.motion {
            Some(Motion::Growth { started_at, .. }) => {
                let t = (now - started_at).min(self.move_duration);
                Some(table.evaluate(Easing::QuadInOut, t, 2.0, -2.0, self.move_duration, None))
            }
            _ => None,
        };
        let fraction = self.n % 1.0;

        for (i, peg) in self.pegs.iter().enumerate() {
            for (j, &disk) in peg.iter().enumerate() {
                match growing {
                    // The new bottom disk swells from nothing while the
                    // rest of the stack rides on top of it
                    Some(x) if j == 0 => self.draw_disk(ctx, disk, x, 0.0, self.height * fraction),
                    Some(x) => {
                        let y = (j as f64 - 1.0 + fraction) * self.height;
                        self.draw_disk(ctx, disk, x, y, self.height);
                    }
                    None => {
                        let y = j as f64 * self.height;
                        self.draw_disk(ctx, disk, i as f64, y, self.height);
                    }
                }
            }
        }
    }

    fn grow(&mut self, now: f64, from: u32, started_at: f64, table: &EasingTable) {
        let elapsed = now - started_at;
        if elapsed > self.move_duration {
            let disks = from + 1;
            self.n = disks as f64;
            self.height = (1.0 / self.n).min(self.params.max_disk_height);
            self.pegs[0] = std::mem::take(&mut self.pegs[2]);
            self.motion = None;
            self.phase = Phase::First;
            self.move_duration *= self.params.speedup;

            info!(disks, move_duration = self.move_duration, "puzzle grew");
            self.events.push(PuzzleEvent::Grew {
                disks,
                move_duration: self.move_duration,
            });
        } else {
            self.n = table.evaluate(
                Easing::QuadInOut,
                elapsed,
                from as f64,
                1.0,
                self.move_duration,
                None,
            );
            self.height = (1.0 / self.n).min(self.params.max_disk_height);
        }
    }

    fn fly(&mut self, now: f64, m: DiskMove, table: &EasingTable, ctx: &mut dyn DrawContext) {
        let elapsed = now - m.started_at;
        if elapsed > self.move_duration {
            self.draw_disk(ctx, m.disk, m.x + m.dx, m.y + m.dy, self.height);
            self.pegs[m.to].push(m.disk);
            self.motion = None;
            self.moves += 1;

            debug!(disk = m.disk, to = m.to, "move finished");
            self.events.push(PuzzleEvent::MoveFinished {
                disk: m.disk,
                to: m.to,
            });
        } else {
            let d = self.move_duration;
            let x = table.evaluate(Easing::CubicInOut, elapsed, m.x, m.dx, d, None);
            let vertical = if m.dy < 0.0 {
                Easing::ExpoIn
            } else {
                Easing::ExpoOut
            };
            let y = table.evaluate(vertical, elapsed, m.y, m.dy, d, None);
            self.draw_disk(ctx, m.disk, x, y, self.height);
        }
    }

    fn next_move(&mut self, now: f64) {
        let n = self.n as usize;
        let odd = n % 2 == 1;

        if self.pegs[2].len() == n {
            let from = n as u32;
            self.phase = Phase::Growing;
            self.pegs[2].insert(0, from + 1);
            self.motion = Some(Motion::Growth {
                from,
                started_at: now,
            });
            debug!(disks = from + 1, "round solved, adding a disk");
            return;
        }

        let (phase, a, b) = match self.phase {
            Phase::First if odd => (Phase::Second, 0, 2),
            Phase::First => (Phase::Second, 0, 1),
            Phase::Second if odd => (Phase::Third, 0, 1),
            Phase::Second => (Phase::Third, 0, 2),
            Phase::Third => (Phase::First, 1, 2),
            Phase::Growing => return,
        };
        self.phase = phase;
        self.legal_move(a, b, now);
    }

    /// Move the smaller top disk between pegs `a` and `b`
    fn legal_move(&mut self, a: usize, b: usize, now: f64) {
        let top_a = self.pegs[a].last().copied();
        let top_b = self.pegs[b].last().copied();

        let (from, to) = match (top_a, top_b) {
            (Some(da), Some(db)) if da < db => (a, b),
            (Some(_), None) => (a, b),
            (None, None) => return,
            _ => (b, a),
        };

        let from_len = self.pegs[from].len() as f64;
        let to_len = self.pegs[to].len() as f64;
        let Some(disk) = self.pegs[from].pop() else {
            return;
        };

        let disk_move = DiskMove {
            disk,
            from,
            to,
            started_at: now,
            x: from as f64,
            dx: to as f64 - from as f64,
            y: (from_len - 1.0) * self.height,
            dy: (to_len + 1.0 - from_len) * self.height,
        };
        self.motion = Some(Motion::Disk(disk_move));

        debug!(disk, from, to, "move started");
        self.events.push(PuzzleEvent::MoveStarted { disk, from, to });
    }
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new(PuzzleParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, RecordingContext};

    /// Run frames every `step` ms until `until`, returning all events
    fn run(
        puzzle: &mut Puzzle,
        table: &EasingTable,
        from: f64,
        until: f64,
        step: f64,
    ) -> Vec<PuzzleEvent> {
        let mut ctx = RecordingContext::default();
        let mut events = Vec::new();
        let mut now = from;
        while now <= until {
            ctx.clear();
            puzzle.frame(now, table, &mut ctx);
            events.extend(puzzle.take_events());
            now += step;
        }
        events
    }

    fn count_disks(puzzle: &Puzzle) -> usize {
        puzzle.pegs().iter().map(|p| p.len()).sum::<usize>()
            + usize::from(puzzle.current_move().is_some())
    }

    #[test]
    fn test_first_move_goes_to_last_peg() {
        let table = EasingTable::new();
        let mut puzzle = Puzzle::default();
        let mut ctx = RecordingContext::default();

        puzzle.frame(0.0, &table, &mut ctx);
        assert_eq!(
            puzzle.take_events(),
            vec![PuzzleEvent::MoveStarted { disk: 1, from: 0, to: 2 }]
        );
        let m = puzzle.current_move().unwrap();
        assert_eq!((m.x, m.dx, m.y, m.dy), (0.0, 2.0, 0.0, 0.0));
        assert_eq!(puzzle.phase(), Phase::Second);
    }

    #[test]
    fn test_single_disk_round_grows_puzzle() {
        let table = EasingTable::new();
        let mut puzzle = Puzzle::default();

        // The move lands at 1010 and growth starts on the next frame
        let events = run(&mut puzzle, &table, 0.0, 1020.0, 10.0);
        assert!(events.contains(&PuzzleEvent::MoveFinished { disk: 1, to: 2 }));
        assert_eq!(puzzle.phase(), Phase::Growing);
        assert_eq!(puzzle.pegs()[2].as_slice(), &[2, 1]);

        // Mid growth the disk count is fractional
        let mut ctx = RecordingContext::default();
        puzzle.frame(1520.0, &table, &mut ctx);
        assert!(puzzle.disk_count() > 1.0 && puzzle.disk_count() < 2.0);

        let events = run(&mut puzzle, &table, 1530.0, 2030.0, 10.0);
        assert!(events.contains(&PuzzleEvent::Grew {
            disks: 2,
            move_duration: 750.0
        }));
        assert_eq!(puzzle.disk_count(), 2.0);
        assert_eq!(puzzle.pegs()[0].as_slice(), &[2, 1]);
        assert!(puzzle.pegs()[2].is_empty());
        assert_eq!(puzzle.disk_height(), 0.2);
        assert_eq!(puzzle.phase(), Phase::First);
    }

    #[test]
    fn test_moves_stay_legal_across_rounds() {
        let table = EasingTable::new();
        let params = PuzzleParams {
            move_duration: 40.0,
            ..PuzzleParams::default()
        };
        let mut puzzle = Puzzle::new(params);
        let mut ctx = RecordingContext::default();

        let mut now = 0.0;
        let mut grew_to = 1;
        while grew_to < 5 && now < 200_000.0 {
            puzzle.frame(now, &table, &mut ctx);
            ctx.clear();
            for event in puzzle.take_events() {
                if let PuzzleEvent::Grew { disks, .. } = event {
                    grew_to = disks;
                }
            }
            for peg in puzzle.pegs() {
                if puzzle.phase() != Phase::Growing {
                    assert!(peg.windows(2).all(|w| w[0] > w[1]), "illegal stack {peg:?}");
                }
            }
            // The incoming disk joins the last peg while growing
            let expected = grew_to as usize + usize::from(puzzle.phase() == Phase::Growing);
            assert_eq!(count_disks(&puzzle), expected);
            now += 5.0;
        }
        assert_eq!(grew_to, 5);
    }

    #[test]
    fn test_round_takes_minimal_moves() {
        let table = EasingTable::new();
        let params = PuzzleParams {
            move_duration: 10.0,
            speedup: 1.0,
            ..PuzzleParams::default()
        };
        let mut puzzle = Puzzle::new(params);
        let mut ctx = RecordingContext::default();

        let mut now = 0.0;
        let mut rounds = Vec::new();
        let mut last = 0;
        while rounds.len() < 4 {
            puzzle.frame(now, &table, &mut ctx);
            ctx.clear();
            for event in puzzle.take_events() {
                if let PuzzleEvent::Grew { .. } = event {
                    rounds.push(puzzle.moves() - last);
                    last = puzzle.moves();
                }
            }
            now += 1.0;
        }
        // 2^n - 1 moves for n = 1, 2, 3, 4
        assert_eq!(rounds, vec![1, 3, 7, 15]);
    }

    #[test]
    fn test_frame_draws_every_disk() {
        let table = EasingTable::new();
        let mut puzzle = Puzzle::default();
        let mut ctx = RecordingContext::default();

        puzzle.frame(0.0, &table, &mut ctx);
        ctx.clear();
        puzzle.frame(500.0, &table, &mut ctx);

        let fills: Vec<_> = ctx
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect();
        assert!(matches!(ctx.commands()[0], DrawCommand::Clear(_)));
        assert_eq!(fills.len(), 1);

        // Disk 1 of 1 is 0.75 wide and halfway along its cubic path
        let (rect, color) = fills[0];
        assert!((rect.width() - 0.75).abs() < 1e-9);
        assert!((rect.x() + rect.width() / 2.0 - 1.0).abs() < 1e-9);
        assert_eq!(color, Color::from_hex(0xFF0000));
    }
}
