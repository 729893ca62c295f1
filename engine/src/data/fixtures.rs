//! Seeded fixture data: customers, knowledge base articles, sample tickets

use crate::ticket::{CustomerContext, KnowledgeBaseEntry, PlanTier, Ticket, TicketMessage};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn message(body: &str, timestamp: &str) -> TicketMessage {
    TicketMessage {
        body: body.to_string(),
        timestamp: timestamp.to_string(),
    }
}

pub fn customers() -> Vec<CustomerContext> {
    vec![
        CustomerContext {
            customer_id: "cust_001".to_string(),
            name: "Alex Rivera".to_string(),
            email: "alex.r@example.com".to_string(),
            plan: PlanTier::Free,
            mrr: 0.0,
            tenure_months: 4,
            seats: 1,
            usage_last_7d: 5,
            usage_last_30d: 18,
            total_tickets: 0,
            open_tickets: 1,
            last_csat_score: None,
            previous_escalations: 0,
            active_incidents: vec![],
        },
        CustomerContext {
            customer_id: "cust_002".to_string(),
            name: "Somchai Thanaporn".to_string(),
            email: "somchai.t@enterprise-th.example.com".to_string(),
            plan: PlanTier::Enterprise,
            mrr: 4500.0,
            tenure_months: 8,
            seats: 45,
            usage_last_7d: 7,
            usage_last_30d: 30,
            total_tickets: 3,
            open_tickets: 1,
            last_csat_score: Some(4.2),
            previous_escalations: 0,
            active_incidents: strings(&[
                "INC-2024-0892: Intermittent 500 errors in Asia-Pacific region",
            ]),
        },
        CustomerContext {
            customer_id: "cust_003".to_string(),
            name: "Jordan Patel".to_string(),
            email: "jordan.p@example.com".to_string(),
            plan: PlanTier::Pro,
            mrr: 29.99,
            tenure_months: 5,
            seats: 1,
            usage_last_7d: 7,
            usage_last_30d: 28,
            total_tickets: 0,
            open_tickets: 1,
            last_csat_score: None,
            previous_escalations: 0,
            active_incidents: vec![],
        },
    ]
}

pub fn knowledge_base() -> Vec<KnowledgeBaseEntry> {
    vec![
        KnowledgeBaseEntry {
            article_id: "KB-001".to_string(),
            title: "Troubleshooting Failed Payment & Duplicate Charges".to_string(),
            content: "If a customer experiences a failed payment during plan upgrade, \
                check the payment gateway logs for declined transactions. Duplicate \
                pending charges typically resolve within 3-5 business days as \
                authorisation holds expire. If the customer needs immediate resolution: \
                1) Verify charges in Stripe dashboard, 2) Void any duplicate authorisations, \
                3) Manually activate the plan upgrade, 4) Confirm with the customer."
                .to_string(),
            tags: strings(&["billing", "payment", "upgrade", "charges", "duplicate", "refund"]),
            category: "Billing".to_string(),
        },
        KnowledgeBaseEntry {
            article_id: "KB-002".to_string(),
            title: "How to Upgrade from Free to Pro Plan".to_string(),
            content: "Navigate to Settings > Subscription > Upgrade. Select the Pro plan \
                and enter payment details. The upgrade is effective immediately. \
                Pro features include: advanced exports (PDF, PPTX), priority support, \
                custom branding, and API access."
                .to_string(),
            tags: strings(&["billing", "upgrade", "pro", "plan", "subscription"]),
            category: "Billing".to_string(),
        },
        KnowledgeBaseEntry {
            article_id: "KB-003".to_string(),
            title: "Resolving HTTP 500 Internal Server Errors".to_string(),
            content: "HTTP 500 errors indicate a server-side issue. Steps to diagnose: \
                1) Check status.company.com for active incidents, \
                2) Verify if the issue is region-specific (check regional health dashboard), \
                3) Ask the customer for their region/data-centre, \
                4) Check recent deployment logs for regressions. \
                For enterprise customers, escalate to the on-call SRE immediately \
                if the issue persists beyond 30 minutes."
                .to_string(),
            tags: strings(&["error", "500", "outage", "server", "region", "enterprise"]),
            category: "Technical".to_string(),
        },
        KnowledgeBaseEntry {
            article_id: "KB-004".to_string(),
            title: "Regional Infrastructure & Data Centres".to_string(),
            content: "We operate in 4 regions: US-East, US-West, EU-West, and Asia-Pacific. \
                Enterprise customers in Thailand are routed through the Asia-Pacific region \
                (ap-southeast-1). Regional outages should be verified via the internal \
                region health dashboard at internal.company.com/health."
                .to_string(),
            tags: strings(&["region", "infrastructure", "asia", "enterprise", "data centre"]),
            category: "Technical".to_string(),
        },
        KnowledgeBaseEntry {
            article_id: "KB-005".to_string(),
            title: "Dark Mode & Appearance Settings".to_string(),
            content: "Dark mode is available under Settings > Appearance. Users can choose \
                'Light', 'Dark', or 'System Default'. Known issue: the 'System Default' \
                option on macOS may not correctly detect dark mode if the app was opened \
                before the system theme was changed. Workaround: restart the app after \
                changing macOS appearance settings. A fix is planned for v2.14."
                .to_string(),
            tags: strings(&["dark mode", "appearance", "theme", "settings", "ui", "bug"]),
            category: "Product".to_string(),
        },
        KnowledgeBaseEntry {
            article_id: "KB-006".to_string(),
            title: "Feature Requests & Feedback Process".to_string(),
            content: "We track feature requests in our public roadmap at roadmap.company.com. \
                To submit on behalf of a customer: 1) Log the request in the feedback tool, \
                2) Tag the customer's plan tier, 3) Link to the support ticket. \
                Scheduled/automated dark mode is on the roadmap for Q3. \
                Pro and Enterprise customer requests are prioritised."
                .to_string(),
            tags: strings(&["feature request", "feedback", "roadmap", "dark mode", "schedule"]),
            category: "Product".to_string(),
        },
        KnowledgeBaseEntry {
            article_id: "KB-007".to_string(),
            title: "Escalation Policy & SLA Guidelines".to_string(),
            content: "Critical tickets (score 60+) must be acknowledged within 15 minutes. \
                Enterprise customers with active incidents get automatic escalation to \
                the on-call engineering team. High-priority tickets (score 40-59) should \
                be responded to within 1 hour. Medium and low tickets follow standard SLA \
                of 4 hours and 24 hours respectively."
                .to_string(),
            tags: strings(&["escalation", "sla", "priority", "enterprise", "critical"]),
            category: "Process".to_string(),
        },
    ]
}

pub fn sample_tickets() -> Vec<Ticket> {
    vec![
        // Billing / duplicate charges, free plan customer
        Ticket {
            ticket_id: "TKT-1001".to_string(),
            customer_id: "cust_001".to_string(),
            channel: "email".to_string(),
            subject: "Payment failed during Pro upgrade — duplicate charges".to_string(),
            messages: vec![
                message(
                    "My payment failed when I tried to upgrade to Pro. Can you check what's wrong?",
                    "3 hours ago",
                ),
                message(
                    "I tried again with a different card. Now I see TWO pending charges but my account still shows Free plan??",
                    "2 hours ago",
                ),
                message(
                    "Okay this is getting ridiculous. Just checked my bank app - \
                     I have THREE charges of $29.99 now. None of them refunded. \
                     And I STILL don't have Pro access.",
                    "1 hour ago",
                ),
                message(
                    "HELLO?? Is anyone there??? I need this fixed NOW. I have a \
                     presentation in 2 hours and I need the Pro export features. \
                     If these charges aren't reversed by end of day I'm disputing \
                     all of them with my bank.",
                    "just now",
                ),
            ],
            tags: strings(&["billing", "payment", "upgrade"]),
        },
        // Enterprise outage in Thailand, reported in Thai
        Ticket {
            ticket_id: "TKT-1002".to_string(),
            customer_id: "cust_002".to_string(),
            channel: "email".to_string(),
            subject: "System down — Error 500 across all browsers".to_string(),
            messages: vec![
                message(
                    "ระบบเข้าไม่ได้ครับ ขึ้น error 500\n(Can't access the system, showing error 500)",
                    "2 hours ago",
                ),
                message(
                    "ลองหลายเครื่องแล้ว ทั้ง Chrome, Safari, Firefox ผลเหมือนกันหมด เพื่อนร่วมงานก็เข้าไม่ได้เหมือนกัน\n\
                     (Tried multiple machines — Chrome, Safari, Firefox — same result. Coworkers also can't access)",
                    "1.5 hours ago",
                ),
                message(
                    "ตอนนี้ลูกค้าโวยเข้ามาเยอะมาก เรามี demo กับลูกค้ารายใหญ่บ่ายนี้ ถ้าระบบไม่กลับมา deal นี้อาจจะหลุด\n\
                     (Customers are flooding in with complaints now. We have a demo with \
                     a major client this afternoon. If the system doesn't come back, \
                     we might lose this deal)",
                    "45 mins ago",
                ),
                message(
                    "เช็ค status.company.com แล้ว บอกว่า all systems operational แต่เราใช้งานไม่ได้จริงๆ \
                     ช่วยเช็คให้หน่อยได้ไหมครับ region Asia มีปัญหาหรือเปล่า?\n\
                     (Checked status.company.com — it says all systems operational, \
                     but we really can't use it. Can you please check? \
                     Is there an issue with the Asia region?)",
                    "just now",
                ),
            ],
            tags: strings(&["outage", "error", "enterprise", "asia"]),
        },
        // Dark mode bug plus feature request, pro plan customer
        Ticket {
            ticket_id: "TKT-1003".to_string(),
            customer_id: "cust_003".to_string(),
            channel: "email".to_string(),
            subject: "Dark mode not working / feature request".to_string(),
            messages: vec![
                message(
                    "Hey, just wondering if you support dark mode? No rush 😊",
                    "2 days ago",
                ),
                message(
                    "Thanks for the reply! Oh nice, so it's in Settings > Appearance. \
                     Found it! But hmm I'm on Pro plan and I only see 'Light' and \
                     'System Default' options. No dark mode toggle?",
                    "1 day ago",
                ),
                message(
                    "Okay so I switched to 'System Default' and my Mac is set to \
                     dark mode, but your app still shows light theme. Is this a bug \
                     or am I missing something?",
                    "1 day ago (3 hours later)",
                ),
                message(
                    "Also random question while I have you — is there a way to schedule \
                     dark mode? Like auto-switch at 6pm? Some apps have that. Would be \
                     cool if you guys added it 👀",
                    "today",
                ),
            ],
            tags: strings(&["dark mode", "feature request", "ui", "bug"]),
        },
    ]
}
