//! # Payroll Module
//!
//! Indian statutory payroll math for the Accounts+ employee register.
//!
//! ## Monthly Payslip Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  basic + hra + transport + medical + special = GROSS                   │
//! │                                                                         │
//! │  PF   : min(basic, ₹15,000) × pf_rate%        (employee = employer)    │
//! │  ESI  : gross ≤ ₹21,000 → gross × esi_rate%   (employer 1.75%)         │
//! │  TDS  : (gross × 12 − ₹50,000 std. deduction) → slab tax ÷ 12          │
//! │                                                                         │
//! │  NET = GROSS − (PF employee + ESI employee + monthly TDS)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## TDS Slabs (annual taxable income)
//! | Taxable           | Tax                                |
//! |-------------------|------------------------------------|
//! | ≤ ₹2,50,000       | 0                                  |
//! | ≤ ₹5,00,000       | 5% above ₹2,50,000                 |
//! | ≤ ₹10,00,000      | ₹12,500 + 20% above ₹5,00,000      |
//! | above             | ₹1,12,500 + 30% above ₹10,00,000   |
//!
//! All arithmetic runs in paise via [`Money`]; rupee figures appear only
//! in the serialized payslip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Rate;

// =============================================================================
// Statutory constants
// =============================================================================

/// PF wage ceiling (₹15,000).
pub const PF_WAGE_CEILING: Money = Money::from_paise(15_000_00);

/// ESI applies only at or below this gross (₹21,000).
pub const ESI_GROSS_LIMIT: Money = Money::from_paise(21_000_00);

/// Employer ESI contribution, 1.75%.
pub const ESI_EMPLOYER_RATE: Rate = Rate::from_bps(175);

/// Standard deduction before slab tax (₹50,000).
pub const STANDARD_DEDUCTION: Money = Money::from_paise(50_000_00);

// =============================================================================
// Inputs
// =============================================================================

/// Salary components of one employee, as monthly amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryStructure {
    pub basic: Money,
    pub hra: Money,
    pub transport: Money,
    pub medical: Money,
    pub special: Money,
    pub pf_rate: Rate,
    pub esi_rate: Rate,
}

impl SalaryStructure {
    pub fn allowances(&self) -> Money {
        self.hra + self.transport + self.medical + self.special
    }

    pub fn gross(&self) -> Money {
        self.basic + self.allowances()
    }
}

// =============================================================================
// Contributions
// =============================================================================

/// A statutory contribution split between employee and employer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contribution {
    pub employee: f64,
    pub employer: f64,
    pub total: f64,
}

impl Contribution {
    fn from_money(employee: Money, employer: Money) -> Self {
        Self {
            employee: employee.to_rupees(),
            employer: employer.to_rupees(),
            total: (employee + employer).to_rupees(),
        }
    }
}

/// Provident fund on `min(basic, ceiling)`; employer matches employee.
pub fn provident_fund(basic: Money, rate: Rate) -> (Money, Money) {
    let share = basic.min(PF_WAGE_CEILING).percent(rate);
    (share, share)
}

/// Employees' State Insurance; zero above the gross limit.
pub fn state_insurance(gross: Money, employee_rate: Rate) -> (Money, Money) {
    if gross > ESI_GROSS_LIMIT {
        return (Money::zero(), Money::zero());
    }
    (gross.percent(employee_rate), gross.percent(ESI_EMPLOYER_RATE))
}

// =============================================================================
// TDS
// =============================================================================

/// Annual income tax computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxComputation {
    pub annual_income: f64,
    pub deductions: f64,
    pub taxable_income: f64,
    pub tax: f64,
    pub monthly_tax: f64,
}

/// Slab tax on annual income after `deductions` and the standard deduction.
///
/// ## Example
/// ```rust
/// use billease_core::money::Money;
/// use billease_core::payroll::income_tax;
///
/// // ₹6,00,000 gross → ₹5,50,000 taxable → 12,500 + 20% of 50,000
/// let tds = income_tax(Money::from_rupees(600_000.0), Money::zero());
/// assert_eq!(tds.tax, 22_500.0);
/// assert_eq!(tds.monthly_tax, 1_875.0);
/// ```
pub fn income_tax(annual_income: Money, deductions: Money) -> TaxComputation {
    let taxable = (annual_income - deductions - STANDARD_DEDUCTION).floor_zero();
    let tax = slab_tax(taxable);
    TaxComputation {
        annual_income: annual_income.to_rupees(),
        deductions: deductions.to_rupees(),
        taxable_income: taxable.to_rupees(),
        tax: tax.to_rupees(),
        monthly_tax: tax.divide_by(12).to_rupees(),
    }
}

fn slab_tax(taxable: Money) -> Money {
    let lakh = |n: i64| Money::from_paise(n * 100_000_00);
    let pct = |m: Money, p: u32| m.percent(Rate::from_bps(p * 100));

    if taxable <= lakh(2) + Money::from_paise(50_000_00) {
        Money::zero()
    } else if taxable <= lakh(5) {
        pct(taxable - Money::from_paise(250_000_00), 5)
    } else if taxable <= lakh(10) {
        Money::from_paise(12_500_00) + pct(taxable - lakh(5), 20)
    } else {
        Money::from_paise(112_500_00) + pct(taxable - lakh(10), 30)
    }
}

// =============================================================================
// Payslip
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Allowances {
    pub hra: f64,
    pub transport: f64,
    pub medical: f64,
    pub special: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Deductions {
    pub pf: f64,
    pub esi: f64,
    pub tds: f64,
    pub professional_tax: f64,
    pub other: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaveBalance {
    pub total: i64,
    pub taken: i64,
    pub balance: i64,
}

/// Leaves remaining; may go negative when leave is overdrawn.
pub fn leave_balance(total: i64, taken: i64) -> LeaveBalance {
    LeaveBalance {
        total,
        taken,
        balance: total - taken,
    }
}

/// Who the payslip is for (copied from the `employees` row).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeRef {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
}

/// A monthly payslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    pub employee_id: i64,
    pub employee_code: String,
    pub employee_name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub month: u32,
    pub year: i32,
    pub basic_salary: f64,
    pub allowances: Allowances,
    pub gross_salary: f64,
    pub deductions: Deductions,
    pub net_salary: f64,
    pub pf: Contribution,
    pub esi: Contribution,
    pub tax: TaxComputation,
    pub leave: LeaveBalance,
    #[ts(as = "String")]
    pub generated_date: DateTime<Utc>,
}

/// Builds the payslip for one month.
///
/// TDS is the monthly share of the annualised gross; no investment
/// deductions are known at this level.
pub fn payslip(
    employee: EmployeeRef,
    salary: SalaryStructure,
    leave: LeaveBalance,
    month: u32,
    year: i32,
    generated_date: DateTime<Utc>,
) -> Payslip {
    let gross = salary.gross();
    let (pf_employee, pf_employer) = provident_fund(salary.basic, salary.pf_rate);
    let (esi_employee, esi_employer) = state_insurance(gross, salary.esi_rate);

    let annual_tax = slab_tax((gross * 12 - STANDARD_DEDUCTION).floor_zero());
    let monthly_tds = annual_tax.divide_by(12);

    let total_deductions = pf_employee + esi_employee + monthly_tds;

    Payslip {
        employee_id: employee.id,
        employee_code: employee.code,
        employee_name: employee.name,
        designation: employee.designation,
        department: employee.department,
        month,
        year,
        basic_salary: salary.basic.to_rupees(),
        allowances: Allowances {
            hra: salary.hra.to_rupees(),
            transport: salary.transport.to_rupees(),
            medical: salary.medical.to_rupees(),
            special: salary.special.to_rupees(),
            total: salary.allowances().to_rupees(),
        },
        gross_salary: gross.to_rupees(),
        deductions: Deductions {
            pf: pf_employee.to_rupees(),
            esi: esi_employee.to_rupees(),
            tds: monthly_tds.to_rupees(),
            professional_tax: 0.0,
            other: 0.0,
            total: total_deductions.to_rupees(),
        },
        net_salary: (gross - total_deductions).to_rupees(),
        pf: Contribution::from_money(pf_employee, pf_employer),
        esi: Contribution::from_money(esi_employee, esi_employer),
        tax: income_tax(gross * 12, Money::zero()),
        leave,
        generated_date,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(r: f64) -> Money {
        Money::from_rupees(r)
    }

    fn structure(basic: f64, hra: f64) -> SalaryStructure {
        SalaryStructure {
            basic: rupees(basic),
            hra: rupees(hra),
            transport: Money::zero(),
            medical: Money::zero(),
            special: Money::zero(),
            pf_rate: Rate::from_percentage(12.0),
            esi_rate: Rate::from_percentage(0.75),
        }
    }

    #[test]
    fn test_pf_capped_at_ceiling() {
        let (emp, er) = provident_fund(rupees(40_000.0), Rate::from_percentage(12.0));
        assert_eq!(emp.to_rupees(), 1_800.0);
        assert_eq!(er, emp);

        let (emp, _) = provident_fund(rupees(10_000.0), Rate::from_percentage(12.0));
        assert_eq!(emp.to_rupees(), 1_200.0);
    }

    #[test]
    fn test_esi_only_below_limit() {
        let (emp, er) = state_insurance(rupees(20_000.0), Rate::from_percentage(0.75));
        assert_eq!(emp.to_rupees(), 150.0);
        assert_eq!(er.to_rupees(), 350.0);

        let (emp, er) = state_insurance(rupees(21_000.01), Rate::from_percentage(0.75));
        assert!(emp.is_zero() && er.is_zero());
    }

    #[test]
    fn test_tds_slabs() {
        assert_eq!(income_tax(rupees(300_000.0), Money::zero()).tax, 0.0);
        // 4,00,000 - 50,000 = 3,50,000 → 5% of 1,00,000
        assert_eq!(income_tax(rupees(400_000.0), Money::zero()).tax, 5_000.0);
        // 15,50,000 - 50,000 = 15,00,000 → 1,12,500 + 30% of 5,00,000
        assert_eq!(income_tax(rupees(1_550_000.0), Money::zero()).tax, 262_500.0);
    }

    #[test]
    fn test_tds_taxable_never_negative() {
        let t = income_tax(rupees(20_000.0), rupees(100_000.0));
        assert_eq!(t.taxable_income, 0.0);
        assert_eq!(t.tax, 0.0);
    }

    #[test]
    fn test_payslip_net_salary() {
        // gross 20,000: PF 1,200, ESI 150, annual 2,40,000 → no TDS
        let slip = payslip(
            EmployeeRef {
                id: 1,
                code: "E-01".into(),
                name: "Meera".into(),
                ..Default::default()
            },
            structure(10_000.0, 10_000.0),
            leave_balance(12, 3),
            3,
            2024,
            Utc::now(),
        );
        assert_eq!(slip.gross_salary, 20_000.0);
        assert_eq!(slip.deductions.pf, 1_200.0);
        assert_eq!(slip.deductions.esi, 150.0);
        assert_eq!(slip.deductions.tds, 0.0);
        assert_eq!(slip.net_salary, 18_650.0);
        assert_eq!(slip.leave.balance, 9);
    }

    #[test]
    fn test_payslip_monthly_tds() {
        // gross 50,000 → annual 6,00,000 → taxable 5,50,000 → 22,500 / 12
        let slip = payslip(
            EmployeeRef::default(),
            structure(30_000.0, 20_000.0),
            leave_balance(12, 0),
            1,
            2025,
            Utc::now(),
        );
        assert_eq!(slip.deductions.tds, 1_875.0);
        assert_eq!(slip.deductions.esi, 0.0);
        assert_eq!(slip.deductions.pf, 1_800.0);
        assert_eq!(slip.net_salary, 50_000.0 - 1_800.0 - 1_875.0);
    }
}
