//! Human-readable contract interfaces.

use std::collections::HashMap;

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::Function,
    primitives::Bytes,
};

use crate::error::{AppError, Result};

/// The subset of a contract's interface a caller intends to use.
///
/// Built once from human-readable signatures such as
/// `function balanceOf(address) view returns (uint256)` into a table
/// keyed by method name.
#[derive(Debug, Clone)]
pub struct ContractInterface {
    /// Method names in declaration order.
    order: Vec<String>,
    functions: HashMap<String, Function>,
}

impl ContractInterface {
    /// Parse an interface from human-readable function signatures.
    ///
    /// The `function` keyword is optional. Overloads are not supported:
    /// every method name must be unique.
    pub fn parse<S: AsRef<str>>(signatures: &[S]) -> Result<Self> {
        let mut order = Vec::with_capacity(signatures.len());
        let mut functions = HashMap::with_capacity(signatures.len());

        for signature in signatures {
            let raw = signature.as_ref().trim();
            let normalized = normalize_type_aliases(raw);
            let function = Function::parse(&normalized)
                .map_err(|e| AppError::Abi(format!("Invalid signature '{raw}': {e}")))?;

            if functions.contains_key(&function.name) {
                return Err(AppError::Abi(format!(
                    "Method '{}' is declared more than once",
                    function.name
                )));
            }

            order.push(function.name.clone());
            functions.insert(function.name.clone(), function);
        }

        Ok(Self { order, functions })
    }

    /// Look up a method by name.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Method names in declaration order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// ABI-encode a call to `method`, selector included.
    pub fn encode_call(&self, method: &str, args: &[DynSolValue]) -> Result<Bytes> {
        let function = self.lookup(method)?;

        if args.len() != function.inputs.len() {
            return Err(AppError::Abi(format!(
                "{} expects {} argument(s), got {}",
                function.signature(),
                function.inputs.len(),
                args.len()
            )));
        }

        let encoded = function
            .abi_encode_input(args)
            .map_err(|e| AppError::Abi(format!("Failed to encode {}: {e}", function.signature())))?;

        Ok(encoded.into())
    }

    /// Decode the raw return data of `method` per its declared outputs.
    pub fn decode_output(&self, method: &str, data: &[u8]) -> Result<Vec<DynSolValue>> {
        let function = self.lookup(method)?;

        if data.is_empty() && !function.outputs.is_empty() {
            return Err(AppError::Decode(format!(
                "{} returned no data; the target may not be a contract",
                function.signature()
            )));
        }

        function.abi_decode_output(data).map_err(|e| {
            AppError::Decode(format!("Failed to decode {} output: {e}", function.signature()))
        })
    }

    fn lookup(&self, method: &str) -> Result<&Function> {
        self.function(method).ok_or_else(|| AppError::UnknownMethod(method.to_string()))
    }
}

/// Rewrite the bare `uint`/`int` aliases to their canonical 256-bit names
/// so that selectors are computed over canonical types.
fn normalize_type_aliases(signature: &str) -> String {
    let mut out = String::with_capacity(signature.len() + 8);
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        match word.as_str() {
            "uint" => out.push_str("uint256"),
            "int" => out.push_str("int256"),
            other => out.push_str(other),
        }
        word.clear();
    };

    for c in signature.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);

    out
}
