#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must decode to a tree or an error, never panic.
fuzz_target!(|data: &[u8]| {
    if collectsugar::tree_io::is_binary_format(data) {
        if let Ok(mut loaded) = collectsugar::tree_io::decode_binary(data) {
            let config = collectsugar::Config::default();
            let _ = collectsugar::desugar_file_with_handler(&mut loaded.file, &config, |_| {});
        }
    } else if let Ok(text) = std::str::from_utf8(data) {
        let _ = collectsugar::tree_io::from_json(text);
    }
});
