mod tests_stripping;
