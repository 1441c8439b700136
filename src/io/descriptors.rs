//! Text persistence of multi-scale descriptor sets.
//!
//! Each descriptor row takes two lines. The first holds the keypoint as
//! `x y octave angle size`, with `x`, `y` and `angle` in C `%.7e` notation
//! and `size` in `%f` notation. The second holds the 256 descriptor bits as
//! space-separated `0`/`1` characters, eight per byte, most significant bit
//! first, followed by a trailing space. Rows are stored scale-major.

use crate::descriptor::{Descriptor, DescriptorSet, KeypointMeta, DESCRIPTOR_BITS, DESCRIPTOR_BYTES};
use crate::util::{ScaleMatchError, ScaleMatchResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Descriptor rows read back from text, with their keypoint metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorRecords {
    pub descriptors: DescriptorSet,
    pub keypoints: Vec<KeypointMeta>,
}

/// Formats `value` like C's `%.7e`: at least two exponent digits and an
/// explicit exponent sign.
fn format_sci(value: f32) -> String {
    if !value.is_finite() {
        return format!("{value}").to_lowercase();
    }
    let text = format!("{value:.7e}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        None => text,
    }
}

fn write_bits<W: Write>(out: &mut W, desc: &Descriptor) -> ScaleMatchResult<()> {
    let mut line = String::with_capacity(DESCRIPTOR_BITS * 2 + 1);
    for byte in desc.to_bytes() {
        for bit in (0..8).rev() {
            line.push(if byte >> bit & 1 == 1 { '1' } else { '0' });
            line.push(' ');
        }
    }
    writeln!(out, "{line}")?;
    Ok(())
}

/// Writes every row of `set`.
///
/// `keypoints` must be empty or hold one entry per row. Without metadata the
/// keypoint line is zeroed except for the octave, which records the level.
pub fn write_descriptors<W: Write>(
    out: &mut W,
    set: &DescriptorSet,
    keypoints: &[KeypointMeta],
) -> ScaleMatchResult<()> {
    if !keypoints.is_empty() && keypoints.len() != set.len() {
        return Err(ScaleMatchError::InvalidInput(
            "keypoint metadata must have one entry per descriptor row",
        ));
    }
    let per_level = set.num_keypoints().max(1);
    for (i, desc) in set.as_slice().iter().enumerate() {
        let kp = keypoints.get(i).copied().unwrap_or(KeypointMeta {
            octave: (i / per_level) as i32,
            ..KeypointMeta::default()
        });
        writeln!(
            out,
            "{} {} {} {} {:.6}",
            format_sci(kp.x),
            format_sci(kp.y),
            kp.octave,
            format_sci(kp.angle),
            kp.size
        )?;
        write_bits(out, desc)?;
    }
    Ok(())
}

/// Writes `set` to a new file at `path`.
pub fn write_descriptors_file<P: AsRef<Path>>(
    path: P,
    set: &DescriptorSet,
    keypoints: &[KeypointMeta],
) -> ScaleMatchResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_descriptors(&mut out, set, keypoints)?;
    out.flush()?;
    Ok(())
}

fn parse_field<T: std::str::FromStr>(token: Option<&str>, line: usize, name: &str) -> ScaleMatchResult<T> {
    let token = token.ok_or_else(|| ScaleMatchError::Parse {
        line,
        reason: format!("missing {name}"),
    })?;
    token.parse().map_err(|_| ScaleMatchError::Parse {
        line,
        reason: format!("invalid {name} {token:?}"),
    })
}

fn parse_keypoint(text: &str, line: usize) -> ScaleMatchResult<KeypointMeta> {
    let mut fields = text.split_whitespace();
    let kp = KeypointMeta {
        x: parse_field(fields.next(), line, "x")?,
        y: parse_field(fields.next(), line, "y")?,
        octave: parse_field(fields.next(), line, "octave")?,
        angle: parse_field(fields.next(), line, "angle")?,
        size: parse_field(fields.next(), line, "size")?,
    };
    if fields.next().is_some() {
        return Err(ScaleMatchError::Parse {
            line,
            reason: "unexpected trailing fields".to_string(),
        });
    }
    Ok(kp)
}

fn parse_bits(text: &str, line: usize) -> ScaleMatchResult<Descriptor> {
    let mut bytes = [0u8; DESCRIPTOR_BYTES];
    let mut count = 0usize;
    for token in text.split_whitespace() {
        let bit = match token {
            "0" => 0u8,
            "1" => 1u8,
            other => {
                return Err(ScaleMatchError::Parse {
                    line,
                    reason: format!("invalid bit {other:?}"),
                })
            }
        };
        if count < DESCRIPTOR_BITS {
            bytes[count / 8] |= bit << (7 - count % 8);
        }
        count += 1;
    }
    if count != DESCRIPTOR_BITS {
        return Err(ScaleMatchError::Parse {
            line,
            reason: format!("expected {DESCRIPTOR_BITS} bits, found {count}"),
        });
    }
    Ok(Descriptor::from_bytes(&bytes))
}

/// Reads scale-major descriptor rows with `n_levels` levels per keypoint.
pub fn read_descriptors<R: BufRead>(input: R, n_levels: usize) -> ScaleMatchResult<DescriptorRecords> {
    let mut descriptors = Vec::new();
    let mut keypoints = Vec::new();
    let mut pending: Option<KeypointMeta> = None;
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match pending.take() {
            None => pending = Some(parse_keypoint(&line, idx + 1)?),
            Some(kp) => {
                descriptors.push(parse_bits(&line, idx + 1)?);
                keypoints.push(kp);
            }
        }
    }
    if pending.is_some() {
        return Err(ScaleMatchError::Parse {
            line: keypoints.len() * 2 + 1,
            reason: "keypoint line without descriptor bits".to_string(),
        });
    }
    Ok(DescriptorRecords {
        descriptors: DescriptorSet::new(descriptors, n_levels)?,
        keypoints,
    })
}

/// Reads descriptor rows from the file at `path`.
pub fn read_descriptors_file<P: AsRef<Path>>(path: P, n_levels: usize) -> ScaleMatchResult<DescriptorRecords> {
    read_descriptors(BufReader::new(File::open(path)?), n_levels)
}

#[cfg(test)]
mod tests {
    use super::{format_sci, read_descriptors, write_descriptors};
    use crate::descriptor::{Descriptor, DescriptorSet, KeypointMeta};
    use crate::util::ScaleMatchError;

    #[test]
    fn scientific_notation_matches_c() {
        assert_eq!(format_sci(123.4567), "1.2345670e+02");
        assert_eq!(format_sci(0.0), "0.0000000e+00");
        assert_eq!(format_sci(-0.00125), "-1.2500000e-03");
    }

    #[test]
    fn bits_are_written_msb_first() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0b1000_0001;
        let set = DescriptorSet::new(vec![Descriptor::from_bytes(&bytes)], 1).unwrap();
        let kp = KeypointMeta {
            x: 12.5,
            y: 3.0,
            octave: 0,
            angle: 90.0,
            size: 31.0,
        };
        let mut out = Vec::new();
        write_descriptors(&mut out, &set, &[kp]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("1.2500000e+01 3.0000000e+00 0 9.0000000e+01 31.000000")
        );
        let bits = lines.next().unwrap();
        assert!(bits.starts_with("1 0 0 0 0 0 0 1 0 0 "));
        assert!(bits.ends_with("0 "));
        assert_eq!(bits.split_whitespace().count(), 256);
    }

    #[test]
    fn truncated_bits_are_rejected() {
        let text = "0 0 0 0 0\n1 0 1\n";
        let err = read_descriptors(text.as_bytes(), 1).unwrap_err();
        assert!(matches!(err, ScaleMatchError::Parse { line: 2, .. }));
    }

    #[test]
    fn row_count_must_fill_every_level() {
        let set = DescriptorSet::new(vec![Descriptor::default(); 3], 1).unwrap();
        let mut out = Vec::new();
        write_descriptors(&mut out, &set, &[]).unwrap();
        let err = read_descriptors(out.as_slice(), 2).unwrap_err();
        assert_eq!(err, ScaleMatchError::LevelMismatch { rows: 3, n_levels: 2 });
    }

    #[test]
    fn byte_reversed_bit_lines_keep_distances() {
        // Lines written LSB first within each byte read back bit-reversed.
        let a = [0x0Fu8; 32];
        let mut b = [0x0Fu8; 32];
        b[5] = 0xF1;
        let lsb_first = |bytes: &[u8; 32]| -> String {
            let mut line = String::new();
            for byte in bytes {
                for bit in 0..8 {
                    line.push_str(if byte >> bit & 1 == 1 { "1 " } else { "0 " });
                }
            }
            format!("0 0 0 0 0\n{line}\n")
        };
        let text = lsb_first(&a) + &lsb_first(&b);
        let read = read_descriptors(text.as_bytes(), 1).unwrap();
        let rows = read.descriptors.as_slice();
        assert_eq!(rows[0].to_bytes(), [0xF0u8; 32]);
        let expected = Descriptor::from_bytes(&a).distance(&Descriptor::from_bytes(&b));
        assert_eq!(rows[0].distance(&rows[1]), expected);
    }
}
