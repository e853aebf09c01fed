//! Package selection and version ordering

mod test_latest;
mod test_versions;
