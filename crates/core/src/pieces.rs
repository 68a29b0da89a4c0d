//! Pieces module - shape catalog and orientation bitmaps
//!
//! Every shape kind maps to one static [`ShapeSpec`]: a square bounding box,
//! an ordered list of orientation bitmaps (row-major, 0/1) and a colour.
//! A [`Piece`] is just a kind plus an orientation index into that table, so
//! rotating is a pure index bump and never touches the box size or colour.

use crate::rng::SimpleRng;
use crate::types::ShapeKind;

/// Static description of one shape kind
#[derive(Debug)]
pub struct ShapeSpec {
    pub rows: usize,
    pub cols: usize,
    /// 24-bit RGB colour written into the board when the piece freezes
    pub color: u32,
    pub orientations: &'static [&'static [u8]],
}

static O_SPEC: ShapeSpec = ShapeSpec {
    rows: 2,
    cols: 2,
    color: 0xf0f000,
    orientations: &[&[1, 1, 1, 1]],
};

static T_SPEC: ShapeSpec = ShapeSpec {
    rows: 3,
    cols: 3,
    color: 0xa000f0,
    orientations: &[
        &[0, 1, 0, 1, 1, 1, 0, 0, 0],
        &[0, 1, 0, 0, 1, 1, 0, 1, 0],
        &[0, 0, 0, 1, 1, 1, 0, 1, 0],
        &[0, 1, 0, 1, 1, 0, 0, 1, 0],
    ],
};

static I_SPEC: ShapeSpec = ShapeSpec {
    rows: 4,
    cols: 4,
    color: 0x00f0f0,
    orientations: &[
        &[0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0],
        // Four cells in column 1, not the five-cell variant with a stray (2, 2)
        &[0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0],
    ],
};

static Z_SPEC: ShapeSpec = ShapeSpec {
    rows: 3,
    cols: 3,
    color: 0xf00000,
    orientations: &[
        &[1, 1, 0, 0, 1, 1, 0, 0, 0],
        &[0, 0, 1, 0, 1, 1, 0, 1, 0],
    ],
};

static S_SPEC: ShapeSpec = ShapeSpec {
    rows: 3,
    cols: 3,
    color: 0x00f000,
    orientations: &[
        &[0, 1, 1, 1, 1, 0, 0, 0, 0],
        &[1, 0, 0, 1, 1, 0, 0, 1, 0],
    ],
};

static L_SPEC: ShapeSpec = ShapeSpec {
    rows: 3,
    cols: 3,
    color: 0xf0a000,
    orientations: &[
        &[0, 0, 1, 1, 1, 1, 0, 0, 0],
        &[0, 1, 0, 0, 1, 0, 0, 1, 1],
        &[0, 0, 0, 1, 1, 1, 1, 0, 0],
        &[1, 1, 0, 0, 1, 0, 0, 1, 0],
    ],
};

static J_SPEC: ShapeSpec = ShapeSpec {
    rows: 3,
    cols: 3,
    color: 0x0000f0,
    orientations: &[
        &[1, 0, 0, 1, 1, 1, 0, 0, 0],
        &[0, 1, 1, 0, 1, 0, 0, 1, 0],
        &[0, 0, 0, 1, 1, 1, 0, 0, 1],
        &[0, 1, 0, 0, 1, 0, 1, 1, 0],
    ],
};

/// Look up the static table entry for a shape kind
pub fn shape_spec(kind: ShapeKind) -> &'static ShapeSpec {
    match kind {
        ShapeKind::O => &O_SPEC,
        ShapeKind::T => &T_SPEC,
        ShapeKind::I => &I_SPEC,
        ShapeKind::Z => &Z_SPEC,
        ShapeKind::S => &S_SPEC,
        ShapeKind::L => &L_SPEC,
        ShapeKind::J => &J_SPEC,
    }
}

/// A falling piece: shape kind plus current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: ShapeKind,
    orientation: usize,
}

impl Piece {
    /// Fresh piece at orientation 0
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            orientation: 0,
        }
    }

    /// Piece of a uniformly chosen kind, orientation 0
    pub fn random(rng: &mut SimpleRng) -> Self {
        let idx = rng.next_range(ShapeKind::ALL.len() as u32) as usize;
        Self::new(ShapeKind::ALL[idx])
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn orientation(&self) -> usize {
        self.orientation
    }

    pub fn orientation_count(&self) -> usize {
        self.spec().orientations.len()
    }

    pub fn rows(&self) -> usize {
        self.spec().rows
    }

    pub fn cols(&self) -> usize {
        self.spec().cols
    }

    pub fn color(&self) -> u32 {
        self.spec().color
    }

    fn spec(&self) -> &'static ShapeSpec {
        shape_spec(self.kind)
    }

    /// Bitmap of the current orientation (row-major, `rows * cols` long)
    pub fn cells(&self) -> &'static [u8] {
        self.spec().orientations[self.orientation]
    }

    /// Local cell value; nonzero means occupied
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells()[row * self.cols() + col]
    }

    /// Occupied local cells as (row, col) pairs
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols();
        self.cells()
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    /// The same piece advanced to its next orientation.
    ///
    /// Pure: the caller decides whether to commit it and where to put it.
    pub fn rotate_next(&self) -> Self {
        Self {
            kind: self.kind,
            orientation: (self.orientation + 1) % self.orientation_count(),
        }
    }
}
