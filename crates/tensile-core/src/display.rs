use std::fmt;

use crate::tensor::Tensor;

// Deterministic nested-bracket rendering of a tensor's values, row-major
// with the innermost axis fastest. Stable enough to serve as a golden
// output format in tests.
//
//   Tensor(3.0000)                      rank 0
//   Tensor([0.0000 1.0000])             rank 1
//   Tensor([[0.0000 1.0000]             rank 2: one row per line, aligned
//           [2.0000 3.0000]])                   under the opening bracket
//
// Rank 3 and above separate outer blocks with a blank line.

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor(")?;
        if self.rank() == 0 {
            write!(f, "{:6.4}", self.values()[0])?;
        } else {
            fmt_block(f, self.values(), self.dims(), 7)?;
        }
        write!(f, ")")
    }
}

/// Render one block of `data` shaped `dims`, with continuation lines
/// indented by `indent` spaces.
fn fmt_block(f: &mut fmt::Formatter<'_>, data: &[f32], dims: &[usize], indent: usize) -> fmt::Result {
    if dims.len() <= 1 {
        write!(f, "[")?;
        for (i, v) in data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:6.4}", v)?;
        }
        return write!(f, "]");
    }

    let chunk: usize = dims[1..].iter().product();
    write!(f, "[")?;
    for i in 0..dims[0] {
        if i > 0 {
            // One newline per collapsed level: rows of a matrix sit on
            // consecutive lines, outer blocks get blank lines between them.
            for _ in 0..dims.len() - 1 {
                writeln!(f)?;
            }
            write!(f, "{}", " ".repeat(indent + 1))?;
        }
        fmt_block(f, &data[i * chunk..(i + 1) * chunk], &dims[1..], indent + 1)?;
    }
    write!(f, "]")
}

// `Debug` is the one-line metadata summary; the value dump lives in
// `Display` above. Deriving would print the full data buffer.
impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor(shape={}, rank={})", self.shape(), self.rank())
    }
}

impl Tensor {
    /// One-line shape and rank summary, e.g. `Tensor(shape=[3, 3], rank=2)`.
    pub fn specs(&self) -> String {
        format!("{self:?}")
    }
}
