mod catalog_tests;
mod support;
