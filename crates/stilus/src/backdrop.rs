use std::time::{SystemTime, UNIX_EPOCH};

const DROP_COUNT: usize = 40;

/// Minimal xorshift64 generator for the backdrop animation. Decorative
/// randomness only; nothing here needs statistical quality.
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // A zero state would stay zero forever.
        Self(seed | 1)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            0
        } else {
            self.next() % bound
        }
    }
}

struct Raindrop {
    x: u16,
    y: i32,
    speed: i32,
    len: i32,
}

/// The falling-glyph animation behind the home menu. Each drop is a short
/// vertical run of random printable glyphs; drops that fall off the bottom
/// respawn above the screen in a random column.
pub struct Backdrop {
    drops: Vec<Raindrop>,
    rng: XorShift,
}

impl Backdrop {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed_5eed);
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = XorShift::new(seed);
        let drops = (0..DROP_COUNT)
            .map(|_| Raindrop {
                x: rng.below(120) as u16,
                y: rng.below(40) as i32,
                speed: 1 + rng.below(2) as i32,
                len: 4 + rng.below(8) as i32,
            })
            .collect();
        Self { drops, rng }
    }

    /// Advance every drop one animation step.
    pub fn advance(&mut self, rows: u16, cols: u16) {
        for drop in &mut self.drops {
            drop.y += drop.speed;
            if drop.y > i32::from(rows) {
                drop.y = -drop.len;
                drop.x = self.rng.below(u64::from(cols.max(1))) as u16;
            }
        }
    }

    /// The glyph cells currently on screen, as (col, row, glyph). Glyphs
    /// are re-randomized every frame, which is what makes the rain shimmer.
    pub fn visible_glyphs(&mut self, rows: u16, cols: u16) -> Vec<(u16, u16, char)> {
        let mut cells = Vec::new();
        for drop in &self.drops {
            for i in 0..drop.len {
                let y = drop.y + i;
                if y >= 0 && y < i32::from(rows) {
                    let x = drop.x % cols.max(1);
                    let glyph = (b'!' + self.rng.below(90) as u8) as char;
                    cells.push((x, y as u16, glyph));
                }
            }
        }
        cells
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}
