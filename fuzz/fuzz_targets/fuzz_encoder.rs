#![no_main]
use libfuzzer_sys::fuzz_target;

use bytes::BytesMut;
use form_data_encoder::{File, FormData, FormDataEncoder, Options};
use futures_util::stream::TryStreamExt;
use tokio::runtime;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mid = (0..=text.len() / 2)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let (name, value) = text.split_at(mid);

    let mut form = FormData::new();
    form.append(name, value);
    form.append(value, File::new(data.to_vec(), name).with_type(name));

    let options = Options::default().enable_additional_headers(data.len() % 2 == 0);
    let Ok(encoder) = FormDataEncoder::with_options(&form, options) else {
        return;
    };

    let rt = runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    let length = rt.block_on(async {
        let mut stream = encoder.encode();
        let mut buffer = BytesMut::new();
        while let Some(buf) = stream.try_next().await.expect("in-memory form") {
            buffer.extend_from_slice(&buf);
        }
        buffer.len() as u64
    });

    assert_eq!(Some(length), encoder.content_length());
});
