//! Logic signatures: program-derived transaction authorization.
//!
//! A logic signature carries compiled program bytecode (plus optional
//! arguments) instead of an account credential. Its escrow address is the
//! hash of the domain separator and the bytecode, so the same program always
//! controls the same account. A transaction wrapped with a logic signature
//! is submittable as-is; no further signing step applies.

use crate::address::Address;
use crate::constants::LOGIC_SIG_DOMAIN_SEPARATOR;
use crate::utils::{hash, is_empty_vec_opt};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A compiled-program signature attachable to a transaction envelope.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct LogicSignature {
    /// The compiled program bytecode.
    #[serde(rename = "l")]
    #[serde_as(as = "Bytes")]
    pub program: Vec<u8>,

    /// Arguments passed to the program at evaluation time.
    #[serde(rename = "arg")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Vec<Bytes>>")]
    pub args: Option<Vec<Vec<u8>>>,
}

impl LogicSignature {
    /// Wraps compiled bytecode into an argument-less logic signature.
    pub fn new(program: Vec<u8>) -> Self {
        LogicSignature {
            program,
            args: None,
        }
    }

    /// Wraps compiled bytecode together with evaluation arguments.
    pub fn with_args(program: Vec<u8>, args: Vec<Vec<u8>>) -> Self {
        LogicSignature {
            program,
            args: Some(args),
        }
    }

    /// Derives the escrow address controlled by this program.
    pub fn address(&self) -> Address {
        let mut buffer =
            Vec::with_capacity(LOGIC_SIG_DOMAIN_SEPARATOR.len() + self.program.len());
        buffer.extend_from_slice(LOGIC_SIG_DOMAIN_SEPARATOR.as_bytes());
        buffer.extend_from_slice(&self.program);

        Address(hash(&buffer))
    }
}

impl From<LogicSignature> for Address {
    fn from(lsig: LogicSignature) -> Address {
        lsig.address()
    }
}

impl Display for LogicSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.address().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_a_pure_function_of_the_program() {
        let a = LogicSignature::new(vec![0x06, 0x81, 0x01]);
        let b = LogicSignature::new(vec![0x06, 0x81, 0x01]);
        let c = LogicSignature::new(vec![0x06, 0x81, 0x00]);

        assert_eq!(a.address(), b.address());
        assert_ne!(a.address(), c.address());
    }

    #[test]
    fn test_args_do_not_change_the_address() {
        let plain = LogicSignature::new(vec![0x06, 0x81, 0x01]);
        let with_args =
            LogicSignature::with_args(vec![0x06, 0x81, 0x01], vec![vec![1, 2, 3]]);

        assert_eq!(plain.address(), with_args.address());
    }
}
