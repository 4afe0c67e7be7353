use opencv::core::{CV_8U, CV_8UC3, Mat, StsBadArg};
use opencv::prelude::*;

/// Copy a 3-channel `Mat` into `out` as tightly packed 8-bit bytes
/// (len = cols * rows * 3), whatever the source stride or depth.
///
/// # Errors
/// `StsBadArg` when the `Mat` does not have exactly three channels; the
/// caller converts gray or BGRA frames with `cvt_color` first.
pub fn copy_tight_rgb(mat: &Mat, out: &mut Vec<u8>) -> opencv::Result<()> {
    let channels = mat.channels();
    if channels != 3 {
        return Err(opencv::Error::new(
            StsBadArg,
            format!("expected a 3-channel frame, got {channels} channels"),
        ));
    }

    // A converted or cloned Mat is always continuous, i.e. rows carry no padding.
    let owned;
    let src = if mat.depth() != CV_8U {
        let mut fixed = Mat::default();
        mat.convert_to(&mut fixed, CV_8UC3, 1.0, 0.0)?;
        owned = fixed;
        &owned
    } else if mat.is_continuous() {
        mat
    } else {
        owned = mat.try_clone()?;
        &owned
    };

    out.clear();
    out.extend_from_slice(src.data_bytes()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use opencv::core::{CV_8UC1, CV_8UC4, CV_32FC3, Scalar};

    fn filled(typ: i32, value: f64) -> Mat {
        Mat::new_rows_cols_with_default(2, 3, typ, Scalar::all(value)).unwrap()
    }

    #[test]
    fn copies_eight_bit_rgb_tightly() {
        let mut out = Vec::new();
        copy_tight_rgb(&filled(CV_8UC3, 7.0), &mut out).unwrap();
        assert_eq!(out, vec![7u8; 2 * 3 * 3]);
    }

    #[test]
    fn converts_depth_but_not_channels() {
        let mut out = vec![1, 2];
        copy_tight_rgb(&filled(CV_32FC3, 9.0), &mut out).unwrap();
        assert_eq!(out, vec![9u8; 2 * 3 * 3]);

        for typ in [CV_8UC1, CV_8UC4] {
            assert!(copy_tight_rgb(&filled(typ, 0.0), &mut out).is_err());
        }
    }
}
