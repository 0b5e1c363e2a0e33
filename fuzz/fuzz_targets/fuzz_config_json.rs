#![no_main]

use bandscrub_dsp::KaiserFirDesigner;
use bandscrub_spec::RunConfig;
use libfuzzer_sys::fuzz_target;

// Narrower transitions need very long filters; skip designing those.
const MIN_FUZZ_WIDTH: f64 = 1e-3;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = RunConfig::from_json(text) else {
        return;
    };

    let result = config.validate();

    let json = config.to_json_pretty().expect("config serializes");
    let reparsed = RunConfig::from_json(&json).expect("serialized config parses");
    assert_eq!(reparsed.validate().is_ok(), result.is_ok());

    if !result.is_ok() {
        return;
    }

    let spec = config.filter_spec();
    if spec.transition_width() >= MIN_FUZZ_WIDTH && spec.ripple_db <= 200.0 {
        let taps = KaiserFirDesigner::design(&spec).expect("validated spec designs");
        assert_eq!(taps.len() % 2, 1);
    }
});
