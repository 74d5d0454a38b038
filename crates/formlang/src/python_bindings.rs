//! PyO3 bindings.
//!
//! Exposes regex compilation, authored automata and equivalence checking
//! as the `formlang` Python module.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::automaton::{AutomatonSpec, Nfa, Verdict};
use crate::error::EngineError;

impl From<EngineError> for PyErr {
    fn from(err: EngineError) -> PyErr {
        match err {
            EngineError::InvalidFormat(_) => PyValueError::new_err(err.to_string()),
            EngineError::AmbiguousGrammar(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// A compiled automaton.
#[pyclass(name = "Nfa", module = "formlang", frozen)]
pub struct PyNfa {
    nfa: Nfa,
}

#[pymethods]
impl PyNfa {
    /// Check whether the automaton accepts a string.
    fn accepts(&self, input: &str) -> bool {
        self.nfa.accepts(input)
    }

    /// Check whether the automaton accepts nothing at all.
    fn is_empty(&self) -> bool {
        self.nfa.is_empty()
    }

    #[getter]
    fn num_states(&self) -> u32 {
        self.nfa.num_states()
    }

    #[getter]
    fn alphabet(&self) -> String {
        self.nfa.alphabet().iter().collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "Nfa(states={}, alphabet={})",
            self.nfa.num_states(),
            self.nfa.alphabet()
        )
    }
}

/// Compile a regex. The alphabet is inferred when omitted.
#[pyfunction]
#[pyo3(name = "regex_to_nfa", signature = (regex, alphabet = None))]
fn py_regex_to_nfa(regex: &str, alphabet: Option<&str>) -> PyResult<PyNfa> {
    let nfa = crate::compiler::regex_to_nfa(regex, alphabet)?;
    Ok(PyNfa { nfa })
}

/// Build an automaton from its JSON form.
#[pyfunction]
fn automaton_from_json(json: &str) -> PyResult<PyNfa> {
    let nfa = AutomatonSpec::from_json(json)?.to_nfa()?;
    Ok(PyNfa { nfa })
}

/// Compare two automata. Returns `None` when they are equivalent and the
/// shortest distinguishing string otherwise.
#[pyfunction]
#[pyo3(name = "equivalent")]
fn py_equivalent(left: &PyNfa, right: &PyNfa) -> Option<String> {
    match crate::automaton::equivalent(&left.nfa, &right.nfa) {
        Verdict::Equal => None,
        Verdict::CounterExample(witness) => Some(witness),
    }
}

#[pymodule]
fn formlang(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNfa>()?;
    m.add_function(wrap_pyfunction!(py_regex_to_nfa, m)?)?;
    m.add_function(wrap_pyfunction!(automaton_from_json, m)?)?;
    m.add_function(wrap_pyfunction!(py_equivalent, m)?)?;
    Ok(())
}
