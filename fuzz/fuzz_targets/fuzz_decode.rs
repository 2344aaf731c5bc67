#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::{DecodeRequest, ImageInfo, Permissiveness};

fuzz_target!(|data: &[u8]| {
    // Probe and every permissiveness level must never panic
    let _ = ImageInfo::from_bytes(data);
    for permissiveness in [
        Permissiveness::Strict,
        Permissiveness::Standard,
        Permissiveness::Permissive,
    ] {
        let request = DecodeRequest::new().with_permissiveness(permissiveness);
        let _ = request.decode(data, enough::Unstoppable);
        let _ = request.read(&mut std::io::Cursor::new(data), enough::Unstoppable);
    }
});
