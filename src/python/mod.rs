use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use rsebm_components::python::components_module;
use rsebm_core::python::core_module;

#[pymodule]
#[pyo3(name = "_lib")]
fn rsebm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core_module))?;
    m.add_wrapped(wrap_pymodule!(components_module))?;

    set_path(m, "rsebm._lib.core", "core")?;
    set_path(m, "rsebm._lib.components", "components")?;

    Ok(())
}

fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    );
    m.py().run_bound(&code, None, Some(&m.dict()))
}
