use crate::models::Label;

const COMMITMENT: &[&str] = &[
    "I will get this done by Friday",
    "I will follow up with the department",
    "We will ensure this is completed",
    "I promise to look into this matter",
    "I will personally ensure the work begins",
    "I will get back to you with a timeline",
    "I'll take care of this issue personally",
    "I will speak to the commissioner today",
    "I am committed to resolving this",
    "We will add this to our priority list",
    "I will contact the department today",
    "I will ensure this is resolved by",
    "I will demand a written update",
    "I will raise this formally with the department",
    "We will take this up with PWD this week",
    "I will personally follow up with the commissioner",
    "I will raise this with the department head",
    "I will call the commissioner directly today",
    "I will ensure work begins by the given date",
    "I will get back to you on this",
    "Kindly look into this matter",
    "We will take this up immediately",
    "I will speak to the concerned officer today",
    "I will send a notice to the department",
    "I will escalate this to the commissioner",
    "We will take strict action on this",
    "We will fix it",
    "I will fix this issue",
];

const QUESTION: &[&str] = &[
    "Can you give an update on this?",
    "What is the current status?",
    "Has this work been completed?",
    "When will this be done?",
    "Can you check whether the applications have been processed?",
    "What is the reason for the delay?",
    "Why has no progress been made?",
    "How much more time is required?",
    "Is there any update on the pending files?",
    "Who is responsible for this task?",
    "What is the status of the repair work",
    "Has any work started yet",
    "What is the current budget utilization",
    "What action has been taken so far",
    "Can you explain the delay",
    "Is the contractor assigned yet",
];

const ACTION: &[&str] = &[
    "Follow up with PWD commissioner",
    "Send a written update by end of week",
    "Check the status of applications",
    "Fix the contractor assignment issue",
    "Provide a written report on the delay",
    "Coordinate with the local councillor",
    "Assign this task to the junior engineer",
];

const CONTEXT: &[&str] = &[
    "The ward has a population of approximately 45,000",
    "This issue has been ongoing since last monsoon",
    "The budget allocated for this is 2.3 crore",
    "Coverage in the ward is currently at 60 percent",
    "Eligible families are still waiting for processing",
    "The remaining 40 percent relies on open drains",
    "Flooding occurs every year in this specific area",
    "The previous contractor abandoned the site",
];

const NOISE: &[&str] = &[
    "Good morning everyone",
    "Thank you for coming",
    "That concludes the meeting",
    "Please be seated",
    "Thank you all for your questions",
    "Next meeting is scheduled for tomorrow",
    "Let's move to the next item on the agenda",
    "Thank you",
    "Okay",
    "Right",
    "Let us begin",
    "Shall we start",
    "That is all for today",
    "We will close here",
    "Please proceed",
    "Go ahead",
    "Yes please",
    "We need to move faster on this",
    "This is priority",
    "Time is running out",
    "We should focus on this",
];

const ANSWER: &[&str] = &[
    "Yes, that is correct",
    "The budget for this is 2.3 crore",
    "We have already processed the applications",
    "The work started last week",
    "No, that has not been done yet",
    "I have the report right here",
    "The contractor has been notified",
    "The funds have already been released",
    "It is currently under process",
    "The department has approved the plan",
];

/// Example utterances for each label, used as similarity anchors
#[derive(Debug, Clone)]
pub struct PrototypeSet {
    groups: Vec<(Label, Vec<String>)>,
}

impl PrototypeSet {
    /// Build a set from explicit groups; labels without examples are dropped
    pub fn new(groups: Vec<(Label, Vec<String>)>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .filter(|(_, examples)| !examples.is_empty())
                .collect(),
        }
    }

    /// Prototype groups in label order
    pub fn groups(&self) -> impl Iterator<Item = (Label, &[String])> {
        self.groups.iter().map(|(label, ex)| (*label, ex.as_slice()))
    }

    pub fn examples(&self, label: Label) -> &[String] {
        self.groups
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, ex)| ex.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of examples across all labels
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, ex)| ex.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PrototypeSet {
    fn default() -> Self {
        Self::new(vec![
            (Label::Commitment, owned(COMMITMENT)),
            (Label::Question, owned(QUESTION)),
            (Label::Action, owned(ACTION)),
            (Label::Context, owned(CONTEXT)),
            (Label::Noise, owned(NOISE)),
            (Label::Answer, owned(ANSWER)),
        ])
    }
}

fn owned(examples: &[&str]) -> Vec<String> {
    examples.iter().map(|s| s.to_string()).collect()
}
