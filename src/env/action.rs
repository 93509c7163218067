use crate::env::EnvError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CliffWalkingAction {
    Up,
    Right,
    Down,
    Left,
}

impl CliffWalkingAction {
    pub const COUNT: usize = 4;
    pub const ALL: [Self; Self::COUNT] = [Self::Up, Self::Right, Self::Down, Self::Left];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Right => "RIGHT",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Self::Up => '^',
            Self::Right => '>',
            Self::Down => 'v',
            Self::Left => '<',
        }
    }
}

impl TryFrom<usize> for CliffWalkingAction {
    type Error = EnvError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Up),
            1 => Ok(Self::Right),
            2 => Ok(Self::Down),
            3 => Ok(Self::Left),
            _ => Err(EnvError::InvalidAction(value)),
        }
    }
}

impl From<CliffWalkingAction> for usize {
    fn from(action: CliffWalkingAction) -> Self {
        action.index()
    }
}
