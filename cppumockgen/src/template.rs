use askama::Template;

/// The comment block opening every generated file.
#[derive(Clone, Copy)]
pub(crate) struct Heading<'a> {
    pub(crate) version: &'a str,
    pub(crate) generation_options: &'a str,
}

impl<'a> Heading<'a> {
    /// A heading naming this crate's version and the options used.
    pub(crate) fn new(generation_options: &'a str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            generation_options,
        }
    }
}

/// The translation unit defining the mocks.
#[derive(Template, Clone)]
#[template(path = "mock.cpp", escape = "none")]
pub(crate) struct MockSourceTemplate<'a> {
    heading: Heading<'a>,
    header_name: &'a str,
    interpret_as_cpp: bool,
    mocks: Vec<String>,
}

impl<'a> MockSourceTemplate<'a> {
    pub(crate) fn new(
        heading: Heading<'a>,
        header_name: &'a str,
        interpret_as_cpp: bool,
        mocks: Vec<String>,
    ) -> Self {
        Self {
            heading,
            header_name,
            interpret_as_cpp,
            mocks,
        }
    }
}

/// The header declaring the expectation functions.
#[derive(Template, Clone)]
#[template(path = "expect.hpp", escape = "none")]
pub(crate) struct ExpectationHeaderTemplate<'a> {
    heading: Heading<'a>,
    header_name: &'a str,
    interpret_as_cpp: bool,
    expectations: Vec<String>,
}

impl<'a> ExpectationHeaderTemplate<'a> {
    pub(crate) fn new(
        heading: Heading<'a>,
        header_name: &'a str,
        interpret_as_cpp: bool,
        expectations: Vec<String>,
    ) -> Self {
        Self {
            heading,
            header_name,
            interpret_as_cpp,
            expectations,
        }
    }
}

/// The source file defining the expectation functions.
#[derive(Template, Clone)]
#[template(path = "expect.cpp", escape = "none")]
pub(crate) struct ExpectationSourceTemplate<'a> {
    heading: Heading<'a>,
    expectation_header: &'a str,
    expectations: Vec<String>,
}

impl<'a> ExpectationSourceTemplate<'a> {
    pub(crate) fn new(
        heading: Heading<'a>,
        expectation_header: &'a str,
        expectations: Vec<String>,
    ) -> Self {
        Self {
            heading,
            expectation_header,
            expectations,
        }
    }
}
