#![no_main]

use libfuzzer_sys::fuzz_target;
use nftwatch_udata::{
    chain_attr, find_comment, object_attr, rule_attr, set_attr, table_attr, unmarshal,
    Unmarshaller,
};

fuzz_target!(|data: &[u8]| {
    // 해석기 종류와 관계없이 패닉 없이 끝나야 한다
    for interpret in [table_attr, chain_attr, rule_attr, object_attr, set_attr] {
        match unmarshal(data, interpret) {
            Ok(attrs) => {
                let _ = find_comment(&attrs);
            }
            Err(failure) => {
                let _ = failure.to_string();
            }
        }
    }

    // 반복자는 에러를 한 번만 내고 멈춰야 한다
    let errors = Unmarshaller::new(data).filter(Result::is_err).count();
    assert!(errors <= 1);
});
