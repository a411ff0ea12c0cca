use crate::Error;
use std::collections::BTreeMap;

/// Names a correlation function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrelationDescr {
    /// mathematical symbol, e.g. `g(r)`
    pub symbol: &'static str,
    /// short identifier, e.g. `gr`
    pub short_name: &'static str,
    pub description: &'static str,
}

/// The curve computed by a correlation function, plus any scalars derived
/// from it by [`Correlation::analyze`].
///
/// `grid` and `value` always have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorrelationOutput {
    pub grid: Vec<f64>,
    pub value: Vec<f64>,
    pub results: BTreeMap<&'static str, f64>,
}

impl CorrelationOutput {
    pub(crate) fn set_curve(&mut self, grid: Vec<f64>, value: Vec<f64>) {
        debug_assert_eq!(grid.len(), value.len());
        self.grid = grid;
        self.value = value;
        self.results.clear();
    }
}

/// The common life cycle shared by every correlation function.
///
/// An estimator is configured up front (see the builders), [`compute`]
/// fills the `(grid, value)` curve and the optional [`analyze`] derives named
/// scalars from that curve.
///
/// [`compute`]: Correlation::compute
/// [`analyze`]: Correlation::analyze
pub trait Correlation {
    fn descr(&self) -> CorrelationDescr;

    /// Computes the curve, replacing any previous output
    fn compute(&mut self) -> Result<(), Error>;

    /// Derives scalars from the computed curve. This is best-effort: when
    /// nothing can be derived, `output().results` is simply left empty.
    fn analyze(&mut self) {}

    fn output(&self) -> &CorrelationOutput;

    /// Computes the curve and then analyzes it
    fn run(&mut self) -> Result<(), Error> {
        self.compute()?;
        self.analyze();
        Ok(())
    }
}
