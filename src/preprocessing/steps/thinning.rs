use super::threshold::{BACKGROUND, FOREGROUND};
use image::{GrayImage, Luma};

/// Zhang-Suen thinning
///
/// Peels boundary pixels off the foreground in two alternating subpasses
/// until nothing changes, leaving strokes one pixel wide. Any non-zero pixel
/// counts as foreground; pixels outside the image are background.
pub fn apply(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut grid = Grid {
        width: width as i64,
        height: height as i64,
        cells: image.pixels().map(|p| p.0[0] != 0).collect(),
    };

    let mut iterations = 0u32;
    loop {
        let first = grid.subpass(Subpass::First);
        let second = grid.subpass(Subpass::Second);
        iterations += 1;
        if !first && !second {
            break;
        }
    }
    tracing::trace!("Thinning converged after {} iterations", iterations);

    GrayImage::from_fn(width, height, |x, y| {
        if grid.get(x as i64, y as i64) {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

#[derive(Debug, Clone, Copy)]
enum Subpass {
    First,
    Second,
}

struct Grid {
    width: i64,
    height: i64,
    cells: Vec<bool>,
}

impl Grid {
    fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.cells[(y * self.width + x) as usize]
    }

    /// Neighbours P2..P9, clockwise from north
    fn neighbours(&self, x: i64, y: i64) -> [bool; 8] {
        [
            self.get(x, y - 1),
            self.get(x + 1, y - 1),
            self.get(x + 1, y),
            self.get(x + 1, y + 1),
            self.get(x, y + 1),
            self.get(x - 1, y + 1),
            self.get(x - 1, y),
            self.get(x - 1, y - 1),
        ]
    }

    /// Delete every pixel the subpass marks; returns whether anything changed
    fn subpass(&mut self, pass: Subpass) -> bool {
        let mut marked = Vec::new();

        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) && is_deletable(&self.neighbours(x, y), pass) {
                    marked.push((y * self.width + x) as usize);
                }
            }
        }

        for &index in &marked {
            self.cells[index] = false;
        }
        !marked.is_empty()
    }
}

fn is_deletable(n: &[bool; 8], pass: Subpass) -> bool {
    let [p2, _, p4, _, p6, _, p8, _] = *n;

    let occupied = n.iter().filter(|&&v| v).count();
    if !(2..=6).contains(&occupied) {
        return false;
    }

    // Exactly one background -> foreground transition around the ring
    let transitions = (0..8).filter(|&i| !n[i] && n[(i + 1) % 8]).count();
    if transitions != 1 {
        return false;
    }

    match pass {
        Subpass::First => !(p2 && p4 && p6) && !(p4 && p6 && p8),
        Subpass::Second => !(p2 && p4 && p8) && !(p2 && p6 && p8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreground_count(img: &GrayImage) -> usize {
        img.pixels().filter(|p| p.0[0] == FOREGROUND).count()
    }

    #[test]
    fn test_empty_input_gives_empty_skeleton() {
        let img = GrayImage::from_pixel(100, 100, Luma([BACKGROUND]));
        let thinned = apply(&img);
        assert_eq!(foreground_count(&thinned), 0);
    }

    #[test]
    fn test_thick_bar_thins_to_single_line() {
        let img = GrayImage::from_fn(50, 20, |x, y| {
            if (5..45).contains(&x) && (8..13).contains(&y) {
                Luma([FOREGROUND])
            } else {
                Luma([BACKGROUND])
            }
        });

        let thinned = apply(&img);

        for x in 10..40 {
            let column: Vec<u32> = (0..20)
                .filter(|&y| thinned.get_pixel(x, y).0[0] == FOREGROUND)
                .collect();
            assert_eq!(column, vec![10], "column {} should keep only the centre row", x);
        }
    }

    #[test]
    fn test_unit_width_line_is_unchanged() {
        let img = GrayImage::from_fn(30, 10, |x, y| {
            if y == 4 && (3..27).contains(&x) {
                Luma([FOREGROUND])
            } else {
                Luma([BACKGROUND])
            }
        });

        assert_eq!(apply(&img), img);
    }

    #[test]
    fn test_skeleton_is_subset_of_input() {
        let img = GrayImage::from_fn(40, 40, |x, y| {
            let (dx, dy) = (x as i32 - 20, y as i32 - 20);
            let r2 = dx * dx + dy * dy;
            if (64..=196).contains(&r2) {
                Luma([FOREGROUND])
            } else {
                Luma([BACKGROUND])
            }
        });

        let thinned = apply(&img);

        assert!(foreground_count(&thinned) > 0);
        assert!(foreground_count(&thinned) < foreground_count(&img));
        for (x, y, p) in thinned.enumerate_pixels() {
            if p.0[0] == FOREGROUND {
                assert_eq!(img.get_pixel(x, y).0[0], FOREGROUND);
            }
        }
    }
}
