//! SPICE-like netlist parser.
//!
//! Parses line-oriented netlists into finalized [`Circuit`]s:
//!
//! ```text
//! * voltage divider
//! V1 vpos 0 5
//! R1 vpos out 1k
//! R2 out 0 1k
//! ```
//!
//! Supported elements (type letter is the first character of the name,
//! case-insensitive):
//!
//! - `Rname n1 n2 value` - resistor
//! - `Iname n1 n2 value` - current source
//! - `Vname n1 n2 value` - voltage source
//! - `Cname n1 n2 value` - capacitor
//! - `Lname n1 n2 value` - inductor
//! - `Dname anode cathode [Is=value] [n=value]` - Shockley diode
//!
//! Values accept engineering suffixes (`1k`, `4.7u`, `10MEG`, ...).
//! Comment lines start with `*`, `#`, or `//`; lines starting with `.`
//! are directives and are ignored. Ground spells as `0`, `gnd`, or
//! `ground` in any case.

mod error;

use std::fs;
use std::path::Path;

use tinyspice_core::units::parse_value;
use tinyspice_core::{Circuit, Device, Terminal};
use tinyspice_devices::{
    Capacitor, CurrentSource, Diode, DiodeParams, Inductor, Resistor, VoltageSource,
};

pub use error::{Error, Result};

/// Parse a netlist file into a finalized circuit.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Circuit> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parse netlist text into a finalized circuit.
///
/// The returned circuit has its variable space assigned and device
/// terminals rewritten; it is ready for analysis.
pub fn parse(input: &str) -> Result<Circuit> {
    let mut circuit = Circuit::new();

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || is_comment(line) || line.starts_with('.') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let name = tokens[0];
        // split_whitespace never yields an empty token.
        let kind = name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or(' ');

        let device: Box<dyn Device> = match kind {
            'R' | 'I' | 'V' | 'C' | 'L' => {
                let (n1, n2, value) = two_terminal(&mut circuit, &tokens, line_no)?;
                match kind {
                    'R' => Box::new(Resistor::new(name, n1, n2, value)),
                    'I' => Box::new(CurrentSource::new(name, n1, n2, value)),
                    'V' => Box::new(VoltageSource::new(name, n1, n2, value)),
                    'C' => Box::new(Capacitor::new(name, n1, n2, value)),
                    _ => Box::new(Inductor::new(name, n1, n2, value)),
                }
            }
            'D' => parse_diode(&mut circuit, &tokens, line_no)?,
            _ => {
                return Err(Error::UnknownElement {
                    line: line_no,
                    name: name.to_string(),
                })
            }
        };
        circuit.add_device(device)?;
    }

    circuit.finalize()?;
    Ok(circuit)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('*') || line.starts_with('#') || line.starts_with("//")
}

/// Parse the shared `name n1 n2 value` form.
fn two_terminal(
    circuit: &mut Circuit,
    tokens: &[&str],
    line: usize,
) -> Result<(Terminal, Terminal, f64)> {
    if tokens.len() < 4 {
        return Err(Error::InvalidElement {
            line,
            reason: format!("expected 'name n1 n2 value', got {} fields", tokens.len()),
        });
    }
    let n1 = circuit.add_node(tokens[1])?;
    let n2 = circuit.add_node(tokens[2])?;
    let value = parse_value(tokens[3]).ok_or_else(|| Error::InvalidValue {
        line,
        text: tokens[3].to_string(),
    })?;
    Ok((Terminal::node(n1), Terminal::node(n2), value))
}

/// Parse `Dname anode cathode [Is=value] [n=value]`.
fn parse_diode(circuit: &mut Circuit, tokens: &[&str], line: usize) -> Result<Box<dyn Device>> {
    if tokens.len() < 3 {
        return Err(Error::InvalidElement {
            line,
            reason: "expected 'name anode cathode'".to_string(),
        });
    }
    let anode = circuit.add_node(tokens[1])?;
    let cathode = circuit.add_node(tokens[2])?;

    let mut params = DiodeParams::default();
    for token in &tokens[3..] {
        if let Some(text) = key_value(token, "is") {
            params.i_s = parse_value(text).ok_or_else(|| Error::InvalidValue {
                line,
                text: text.to_string(),
            })?;
        } else if let Some(text) = key_value(token, "n") {
            params.n = parse_value(text).ok_or_else(|| Error::InvalidValue {
                line,
                text: text.to_string(),
            })?;
        }
        // Unrecognized key=value parameters are ignored.
    }

    Ok(Box::new(Diode::with_params(
        tokens[0],
        Terminal::node(anode),
        Terminal::node(cathode),
        params,
    )))
}

/// Match a case-insensitive `key=value` token, returning the value text.
fn key_value<'a>(token: &'a str, key: &str) -> Option<&'a str> {
    let (k, v) = token.split_once('=')?;
    k.eq_ignore_ascii_case(key).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_divider() {
        let c = parse(
            "* Simple voltage divider\n\
             V1 vpos 0 5\n\
             R1 vpos out 1k\n\
             R2 out 0 1k\n",
        )
        .unwrap();

        assert!(c.is_finalized());
        assert_eq!(c.num_devices(), 3);
        assert_eq!(c.num_nodes(), 3); // ground, vpos, out
        assert_eq!(c.num_vars(), 3); // two node voltages + one branch
        assert_eq!(c.num_extra_vars(), 1);
    }

    #[test]
    fn test_comments_and_directives_skipped() {
        let c = parse(
            "* SPICE comment\n\
             # hash comment\n\
             // slash comment\n\
             .op\n\
             \n\
             V1 1 0 5\n\
             R1 1 0 1k\n",
        )
        .unwrap();
        assert_eq!(c.num_devices(), 2);
    }

    #[test]
    fn test_ground_aliases_collapse() {
        let c = parse(
            "R1 a gnd 1k\n\
             R2 a GROUND 1k\n\
             R3 a 0 1k\n",
        )
        .unwrap();
        // One non-ground node in total.
        assert_eq!(c.num_nodes(), 2);
        assert_eq!(c.num_vars(), 1);
    }

    #[test]
    fn test_value_suffixes() {
        let c = parse(
            "V1 1 0 1.5\n\
             R1 1 0 4.7k\n\
             C1 1 0 100n\n\
             L1 1 0 10u\n",
        )
        .unwrap();
        assert_eq!(c.num_devices(), 4);
        // V source + inductor each carry a branch current.
        assert_eq!(c.num_extra_vars(), 2);
    }

    #[test]
    fn test_diode_defaults() {
        let c = parse(
            "V1 a 0 0.7\n\
             D1 a 0\n",
        )
        .unwrap();
        assert_eq!(c.num_devices(), 2);
    }

    #[test]
    fn test_diode_parameters() {
        // Parameters survive parsing with case-insensitive keys; check
        // by comparing the parsed device's stamp against a reference
        // diode built with the same parameters.
        use nalgebra::DVector;
        use tinyspice_core::stamp::{IterationState, StampContext};

        let c = parse(
            "V1 a 0 0.7\n\
             D1 a 0 Is=2e-14 N=1.5\n",
        )
        .unwrap();

        let x = DVector::from_vec(vec![0.5, 0.0]);
        let it = IterationState {
            iter: 0,
            x: &x,
            tol_abs: 1e-9,
            tol_rel: 1e-6,
        };
        let mut ctx = StampContext::new(c.num_vars()).unwrap();
        c.devices()[1].stamp_nonlinear(&mut ctx, &it);

        let reference = Diode::with_params(
            "Dref",
            Terminal::Var(0),
            Terminal::Ground,
            DiodeParams { i_s: 2e-14, n: 1.5 },
        );
        let (_, g_eq) = reference.evaluate(0.5);
        let a = ctx.assemble_dense();
        assert!((a[(0, 0)] - g_eq).abs() < 1e-18);

        // And the parsed parameters differ from the defaults.
        let (_, g_default) = Diode::new("Ddef", Terminal::Var(0), Terminal::Ground).evaluate(0.5);
        assert!((a[(0, 0)] - g_default).abs() > 1e-12);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = parse("R1 a b\n").unwrap_err();
        assert!(matches!(err, Error::InvalidElement { line: 1, .. }));
    }

    #[test]
    fn test_bad_value_rejected() {
        let err = parse("R1 a b 1x\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { line: 1, .. }));
    }

    #[test]
    fn test_unknown_element_rejected() {
        let err = parse("Q1 a b c 1\n").unwrap_err();
        assert!(matches!(err, Error::UnknownElement { line: 1, .. }));
    }

    #[test]
    fn test_empty_netlist_rejected() {
        let err = parse("* nothing but comments\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Circuit(tinyspice_core::Error::EmptyCircuit)
        ));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "V1 1 0 5").unwrap();
        writeln!(file, "R1 1 0 1k").unwrap();
        file.flush().unwrap();

        let c = parse_file(file.path()).unwrap();
        assert_eq!(c.num_devices(), 2);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_file("/nonexistent/netlist.sp"),
            Err(Error::Io(_))
        ));
    }
}
