//! Input router: raw key events in, logical intents out.
//!
//! Key events arrive whenever the terminal sends them; the simulation samples
//! one [`InputFrame`] per tick.  Held intents are tracked by the frame they
//! were last seen on, so terminals that never report key releases still work:
//! a key is dropped once it has been silent for `hold_window` frames, or for
//! a few frames once its auto-repeat has started.
//! Keyboard-enhanced terminals (kitty protocol) send real releases and the
//! key is dropped immediately.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

/// Default silence, in frames, after which a held key that has not repeated
/// yet counts as released.  Matches the shortest common OS repeat delay at
/// 60 fps; a second tap after it is a fresh press.
pub const HOLD_WINDOW: u64 = 15;

/// Silence after which an auto-repeating key counts as released.
pub const REPEAT_WINDOW: u64 = 4;

// ── Intents ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    /// Jump on the ground, double jump or jetpack in the air.
    Jump,
    Dive,
    Shoot,
    Sprint,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::Jump,
        Intent::Dive,
        Intent::Shoot,
        Intent::Sprint,
    ];

    fn bit(self) -> u8 {
        match self {
            Intent::MoveLeft => 1,
            Intent::MoveRight => 1 << 1,
            Intent::Jump => 1 << 2,
            Intent::Dive => 1 << 3,
            Intent::Shoot => 1 << 4,
            Intent::Sprint => 1 << 5,
        }
    }
}

/// Canonical intent for a physical key.  Arrow keys and two letter layouts
/// (QWERTY `WASD`, AZERTY `ZQSD`) land on the same intents.
pub fn intent_for(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Left => Some(Intent::MoveLeft),
        KeyCode::Right => Some(Intent::MoveRight),
        KeyCode::Up => Some(Intent::Jump),
        KeyCode::Down => Some(Intent::Dive),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            Some(Intent::Sprint)
        }
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' | 'q' => Some(Intent::MoveLeft),
            'd' => Some(Intent::MoveRight),
            ' ' | 'w' | 'z' => Some(Intent::Jump),
            's' => Some(Intent::Dive),
            'f' | 'x' => Some(Intent::Shoot),
            _ => None,
        },
        _ => None,
    }
}

/// Shift held on a movement key (terminals report `A` for Shift+a).
fn shifted(key: &KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        return true;
    }
    matches!(key.code, KeyCode::Char(c) if c.is_ascii_uppercase())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntentSet(u8);

impl IntentSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, intent: Intent) {
        self.0 |= intent.bit();
    }

    pub fn remove(&mut self, intent: Intent) {
        self.0 &= !intent.bit();
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.0 & intent.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Intent> for IntentSet {
    fn from_iter<T: IntoIterator<Item = Intent>>(iter: T) -> Self {
        let mut set = IntentSet::empty();
        for intent in iter {
            set.insert(intent);
        }
        set
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Pressed(Intent),
    Released(Intent),
}

/// Everything the simulation needs from the keyboard for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub held: IntentSet,
    pub edges: Vec<Edge>,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn holding(intents: &[Intent]) -> Self {
        Self {
            held: intents.iter().copied().collect(),
            edges: Vec::new(),
        }
    }

    pub fn held(&self, intent: Intent) -> bool {
        self.held.contains(intent)
    }

    pub fn pressed(&self, intent: Intent) -> bool {
        self.edges.contains(&Edge::Pressed(intent))
    }

    pub fn released(&self, intent: Intent) -> bool {
        self.edges.contains(&Edge::Released(intent))
    }

    pub fn any_pressed(&self) -> bool {
        self.edges.iter().any(|e| matches!(e, Edge::Pressed(_)))
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Discrete actions outside the intent set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Replay,
    /// Esc: leaves a finished round, or quits from the title screen.
    Back,
    Quit,
    NameChar(char),
    NameBackspace,
    NameSubmit,
}

// ── Router ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct Held {
    /// Frame of the last press or repeat.
    seen: u64,
    repeating: bool,
}

#[derive(Debug)]
pub struct InputRouter {
    held: HashMap<Intent, Held>,
    edges: Vec<Edge>,
    frame: u64,
    hold_window: u64,
    repeat_window: u64,
    text_capture: bool,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputRouter {
    pub fn new() -> Self {
        Self::with_hold_window(HOLD_WINDOW)
    }

    /// Router whose keys expire after `hold_window` silent frames, or after
    /// at most `REPEAT_WINDOW` once they auto-repeat.
    pub fn with_hold_window(hold_window: u64) -> Self {
        let hold_window = hold_window.max(1);
        Self {
            held: HashMap::new(),
            edges: Vec::new(),
            frame: 0,
            hold_window,
            repeat_window: REPEAT_WINDOW.min(hold_window),
            text_capture: false,
        }
    }

    /// While on, letters feed the name-entry prompt instead of intents.
    pub fn set_text_capture(&mut self, on: bool) {
        if on && !self.text_capture {
            self.clear();
        }
        self.text_capture = on;
    }

    pub fn text_capture(&self) -> bool {
        self.text_capture
    }

    /// Drop every held intent and pending edge without emitting releases.
    pub fn clear(&mut self) {
        self.held.clear();
        self.edges.clear();
    }

    /// Record one key event.  Returns a command for keys outside the intent
    /// set; unrecognized keys are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Release
            && key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Some(Command::Quit);
        }

        if self.text_capture {
            return Self::text_command(&key);
        }

        if key.kind == KeyEventKind::Press {
            match key.code {
                KeyCode::Esc => return Some(Command::Back),
                KeyCode::Enter => return Some(Command::Start),
                KeyCode::Char('r') | KeyCode::Char('R') => return Some(Command::Replay),
                _ => {}
            }
        }

        let intent = intent_for(key.code)?;
        let sprint = intent != Intent::Sprint && shifted(&key);

        match key.kind {
            KeyEventKind::Press => {
                self.press(intent);
                if sprint {
                    self.press(Intent::Sprint);
                }
            }
            KeyEventKind::Repeat => {
                self.refresh(intent);
                if sprint {
                    self.refresh(Intent::Sprint);
                }
            }
            KeyEventKind::Release => {
                self.release(intent);
                if sprint {
                    self.release(Intent::Sprint);
                }
            }
        }
        None
    }

    fn text_command(key: &KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                Some(Command::NameChar(c.to_ascii_uppercase()))
            }
            KeyCode::Backspace => Some(Command::NameBackspace),
            KeyCode::Enter => Some(Command::NameSubmit),
            KeyCode::Esc => Some(Command::Back),
            _ => None,
        }
    }

    fn press(&mut self, intent: Intent) {
        // A press for a key that is already held is OS auto-repeat on a
        // terminal without enhancement: refresh, never re-dispatch.
        if self.held.contains_key(&intent) {
            self.refresh(intent);
            return;
        }
        self.held.insert(
            intent,
            Held {
                seen: self.frame,
                repeating: false,
            },
        );
        self.edges.push(Edge::Pressed(intent));
    }

    fn refresh(&mut self, intent: Intent) {
        let frame = self.frame;
        self.held
            .entry(intent)
            .and_modify(|h| {
                h.seen = frame;
                h.repeating = true;
            })
            .or_insert(Held {
                seen: frame,
                repeating: true,
            });
    }

    fn release(&mut self, intent: Intent) {
        if self.held.remove(&intent).is_some() {
            self.edges.push(Edge::Released(intent));
        }
    }

    fn expired(&self, held: &Held) -> bool {
        let window = if held.repeating {
            self.repeat_window
        } else {
            self.hold_window
        };
        self.frame.saturating_sub(held.seen) >= window
    }

    /// Close the current frame: expire silent keys, hand out the held set and
    /// every edge recorded since the previous sample.
    pub fn sample(&mut self) -> InputFrame {
        let mut expired: Vec<Intent> = self
            .held
            .iter()
            .filter(|(_, held)| self.expired(held))
            .map(|(&intent, _)| intent)
            .collect();
        expired.sort_by_key(|i| i.bit());
        for intent in expired {
            self.release(intent);
        }

        let held = self.held.keys().copied().collect();
        let edges = std::mem::take(&mut self.edges);
        self.frame += 1;
        InputFrame { held, edges }
    }
}
