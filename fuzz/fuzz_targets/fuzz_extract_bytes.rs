#![no_main]

use libfuzzer_sys::fuzz_target;
use multer_extract::{constants, Event, ParserPhase, StreamExtractor};

fuzz_target!(|data: &[u8]| {
    let mut extractor = StreamExtractor::new();
    let mut payload_len = 0usize;
    let mut completed_at = None;

    for (idx, &byte) in data.iter().enumerate() {
        let event = extractor.process(byte);
        assert_ne!(event, Event::Error);

        if let Some(boundary) = extractor.boundary() {
            assert!(boundary.len() <= constants::DEFAULT_CAPACITY);
            assert!(boundary.starts_with(constants::BOUNDARY_START_MARKER));
        }

        match event {
            Event::DataBufferAvailable => {
                assert_eq!(extractor.phase(), ParserPhase::ReadingPayload);
                assert!(extractor.data_len() > 0);
                assert!(extractor.data_len() <= constants::DEFAULT_CAPACITY);
                payload_len += extractor.data_len();
            }
            Event::DataStreamCompleted => completed_at = Some(idx),
            _ => assert_eq!(extractor.data_len(), 0),
        }

        if completed_at.is_some() {
            assert!(extractor.is_file_received());
            if completed_at != Some(idx) {
                assert_eq!(event, Event::None);
            }
        }
    }

    assert!(payload_len <= data.len());
});
