//! 상품 속성 및 재고 변동 검증 규칙.
//!
//! 모든 규칙은 순수 함수로 정의되어 DB 없이 테스트 가능합니다.
//! 검증 순서는 핸들러가 아닌 이 모듈의 함수 순서로 고정됩니다:
//! 구매는 존재 확인 → 수량 양수 확인 → 재고 충분 확인 순서입니다.

use rust_decimal::Decimal;

use crate::error::{ShopError, ShopResult};

/// 상품 가격 검증.
///
/// 가격은 0 이상이어야 합니다.
pub fn validate_price(price: Decimal) -> ShopResult<()> {
    if price < Decimal::ZERO {
        return Err(ShopError::InvalidInput(format!(
            "가격은 0 이상이어야 합니다 (입력: {})",
            price
        )));
    }
    Ok(())
}

/// 상품 재고 수량 검증.
///
/// 재고는 0 이상이어야 합니다.
pub fn validate_quantity(quantity: i64) -> ShopResult<()> {
    if quantity < 0 {
        return Err(ShopError::InvalidInput(format!(
            "재고 수량은 0 이상이어야 합니다 (입력: {})",
            quantity
        )));
    }
    Ok(())
}

/// 구매/재입고 요청 수량 검증.
///
/// 변동 수량은 반드시 양수여야 합니다.
pub fn validate_mutation_amount(amount: i64) -> ShopResult<()> {
    if amount <= 0 {
        return Err(ShopError::InvalidInput(format!(
            "수량은 0보다 커야 합니다 (입력: {})",
            amount
        )));
    }
    Ok(())
}

/// 구매 가능 여부 판정.
///
/// 수량 양수 확인 후 재고 충분 여부를 확인합니다.
/// 재고가 이미 낮은 상태에서 0 이하 요청이 들어와도
/// "재고 부족"이 아닌 "잘못된 입력"으로 보고됩니다.
pub fn check_purchase(current_stock: i64, amount: i64) -> ShopResult<()> {
    validate_mutation_amount(amount)?;

    if amount > current_stock {
        return Err(ShopError::InsufficientStock(format!(
            "현재 재고 {} 개, 요청 수량 {} 개",
            current_stock, amount
        )));
    }
    Ok(())
}

/// 사용자 비밀번호 최소 강도 검증.
///
/// 최소 8자 이상이어야 합니다.
pub fn validate_password_strength(password: &str) -> ShopResult<()> {
    if password.len() < 8 {
        return Err(ShopError::InvalidInput(
            "비밀번호는 최소 8자 이상이어야 합니다".to_string(),
        ));
    }
    Ok(())
}

/// 사용자 이름 검증.
///
/// 공백이거나 지나치게 긴 이름은 거부합니다.
pub fn validate_username(username: &str) -> ShopResult<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ShopError::InvalidInput(
            "사용자 이름은 비어 있을 수 없습니다".to_string(),
        ));
    }
    if trimmed.len() > 64 {
        return Err(ShopError::InvalidInput(
            "사용자 이름은 64자를 넘을 수 없습니다".to_string(),
        ));
    }
    Ok(())
}
