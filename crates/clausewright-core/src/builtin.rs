//! Built-in clause library and keyword rules.

use crate::catalog::{DocumentType, KeywordRule};

// ── Non-Disclosure Agreement ──

const NDA_NAME: &str = "Non-Disclosure Agreement";

const NDA_SECTIONS: &[&str] = &[
    "1. Purpose\nThe Parties wish to explore a potential business relationship and may exchange confidential and proprietary information for that purpose.",
    "2. Definition of Confidential Information\n\"Confidential Information\" means any technical, commercial or business information disclosed in any form that is marked or reasonably understood to be confidential.",
    "3. Confidentiality Obligations\nThe Receiving Party shall keep all Confidential Information strictly confidential, shall use it only for the Purpose and shall not disclose it to any third party without prior written consent of the Disclosing Party.",
    "4. Standard of Care\nThe Receiving Party shall protect the Confidential Information using at least the same degree of care it uses for its own confidential information and in no event less than a reasonable degree of care.",
    "5. Exclusions\nConfidential Information does not include information that is or becomes public through no fault of the Receiving Party, was already known without restriction, or is independently developed without reference to the Confidential Information.",
    "6. Term and Survival\nThe obligations under this Agreement start on the Effective Date and continue for three (3) years after the last disclosure of Confidential Information.",
    "7. Return or Destruction\nUpon written request, the Receiving Party shall promptly return or permanently destroy all copies of Confidential Information and confirm such destruction in writing.",
    "8. Remedies\nUnauthorised disclosure may cause irreparable harm. The Disclosing Party is entitled to seek injunctive relief in addition to any other remedies available at law or in equity.",
    "9. Governing Law\nThis Agreement shall be governed by and construed in accordance with the laws of India, without regard to conflict-of-law principles.",
];

// ── Employment Agreement ──

const EMPLOYMENT_NAME: &str = "Employment Agreement";

const EMPLOYMENT_SECTIONS: &[&str] = &[
    "1. Position\nThe Employee is engaged in the position described in the Schedule and shall perform the duties and responsibilities assigned by the Employer from time to time.",
    "2. Commencement and Term\nEmployment commences on the Start Date and continues until terminated in accordance with this Agreement.",
    "3. Working Hours and Location\nThe Employee shall work the standard working hours of the Employer. Remote or hybrid work arrangements, if any, shall be as mutually agreed in writing.",
    "4. Compensation\nThe Employee shall receive the salary and benefits set out in the Schedule, subject to deductions and statutory withholdings as required by law.",
    "5. Confidentiality and Intellectual Property\nAll work products, inventions and materials created in the course of employment are the exclusive property of the Employer. The Employee shall not disclose confidential information during or after employment.",
    "6. Leave and Holidays\nThe Employee is entitled to leave and holidays in accordance with the Employer\u{2019}s policies and applicable law.",
    "7. Probation and Performance\nThe Employee may initially be placed on probation. Ongoing employment is subject to satisfactory performance and adherence to company policies.",
    "8. Termination\nEither Party may terminate this Agreement by giving written notice as specified in the Schedule or payment in lieu of such notice.",
    "9. Governing Law\nThis Agreement shall be governed by and construed in accordance with the laws of India.",
];

// ── Keyword rules ──

const STARTUP_CLAUSES: &[&str] = &[
    "Additional Clause: In a startup context, the Parties acknowledge that products, business models and pricing may evolve and agree to cooperate in good faith to amend this Agreement if required.",
];

const REMOTE_CLAUSES: &[&str] = &[
    "Additional Clause: Where work is performed remotely, the Receiving Party shall ensure secure connections, strong access controls and compliance with the information-security guidelines of the other Party.",
];

const INTERN_CLAUSES: &[&str] = &[
    "Additional Clause: Where the engagement relates to an intern, the primary objective is training and learning and any stipend or benefits shall be as specified in the Schedule.",
];

fn owned(clauses: &[&str]) -> Vec<String> {
    clauses.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn document_types() -> Vec<DocumentType> {
    vec![
        DocumentType {
            key: "nda".into(),
            name: NDA_NAME.into(),
            sections: owned(NDA_SECTIONS),
        },
        DocumentType {
            key: "employment".into(),
            name: EMPLOYMENT_NAME.into(),
            sections: owned(EMPLOYMENT_SECTIONS),
        },
    ]
}

pub(crate) fn keyword_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule {
            keyword: "startup".into(),
            clauses: owned(STARTUP_CLAUSES),
        },
        KeywordRule {
            keyword: "remote".into(),
            clauses: owned(REMOTE_CLAUSES),
        },
        KeywordRule {
            keyword: "intern".into(),
            clauses: owned(INTERN_CLAUSES),
        },
    ]
}
