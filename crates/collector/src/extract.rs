//! 규칙에서 코멘트와 카운터 추출

use nftwatch_udata::{DecodeFailure, find_comment, rule_attr, unmarshal};

use crate::model::{Counter, Expr, Rule};

/// 규칙 udata에서 코멘트를 추출합니다.
///
/// udata가 없거나 코멘트 속성이 없거나 코멘트가 빈 문자열이면 `Ok(None)`입니다.
/// 블롭이 손상된 경우에만 에러를 반환합니다.
pub fn rule_comment(rule: &Rule) -> Result<Option<String>, DecodeFailure> {
    let Some(user_data) = rule.user_data.as_deref() else {
        return Ok(None);
    };

    let attrs = unmarshal(user_data, rule_attr)?;
    Ok(find_comment(&attrs)
        .filter(|c| !c.is_empty())
        .map(str::to_owned))
}

/// 규칙의 첫 번째 카운터 표현식을 반환합니다.
pub fn rule_counter(rule: &Rule) -> Option<Counter> {
    rule.exprs.iter().find_map(|e| match e {
        Expr::Counter(c) => Some(*c),
        Expr::Other(_) => None,
    })
}
